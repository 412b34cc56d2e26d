//! Statement building and ledger snapshot for the executive portal

pub mod error;
pub mod metrics;
pub mod models;
pub mod statements;
pub mod time;
pub mod types;

use chrono::NaiveDate;
use execportal_config::Config;
use execportal_loader::{LoadError, LoaderRef};
use serde::{Deserialize, Serialize};

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use metrics::{derive_metrics, metric_series, Metric, MetricFormat, MetricPoint, MetricSeries, ValueFormat};
pub use models::{LedgerEntry, MetricObservation};
pub use statements::{
    build_balance_sheet, build_income_statement, build_statement, StatementRow, StatementTable,
};
pub use time::{available_periods, PeriodRange};
pub use types::{classify_account, AccountCategory, RowKind, StatementKind, SubtotalLine};

/// Where the explorer's metric observations came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSource {
    /// Read from the performance metrics file
    File,
    /// Computed from the trial balance
    Derived,
}

/// In-memory snapshot, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerData {
    /// Trial balance rows, sorted by period
    pub entries: Vec<LedgerEntry>,
    pub metrics: Vec<MetricObservation>,
    pub metrics_source: MetricsSource,
}

/// Main ledger structure
pub struct Ledger {
    config: Config,
    loader: LoaderRef,
    data: Option<LedgerData>,
}

impl Ledger {
    /// Create an unloaded ledger
    pub fn new(config: Config, loader: LoaderRef) -> Self {
        Self {
            config,
            loader,
            data: None,
        }
    }

    /// Create a ledger over data that is already in memory
    pub fn with_data(config: Config, loader: LoaderRef, data: LedgerData) -> Self {
        Self {
            config,
            loader,
            data: Some(data),
        }
    }

    /// Load the snapshot from the configured files.
    ///
    /// The trial balance is required. A missing metrics file falls back to
    /// metrics derived from the trial balance.
    pub async fn load(&mut self) -> CoreResult<()> {
        let trial_balance_path = self.config.trial_balance_path();
        let entries: Vec<LedgerEntry> = self
            .loader
            .load_trial_balance(trial_balance_path.clone())
            .await?
            .into_iter()
            .map(LedgerEntry::from)
            .collect();

        if entries.is_empty() {
            return Err(CoreError::InvalidFormat {
                message: format!("{} has no rows", trial_balance_path.display()),
            });
        }

        let metrics_path = self.config.performance_metrics_path();
        let (metrics, metrics_source) = match self.loader.load_performance_metrics(metrics_path.clone()).await {
            Ok(records) => (
                records.into_iter().map(MetricObservation::from).collect(),
                MetricsSource::File,
            ),
            Err(LoadError::FileNotFound { path }) => {
                log::warn!(
                    target: "execportal::ledger",
                    "performance metrics file {} not found, deriving metrics from the trial balance",
                    path
                );
                (derive_metrics(&entries)?, MetricsSource::Derived)
            }
            Err(e) => return Err(e.into()),
        };

        log::info!(
            target: "execportal::ledger",
            "loaded {} ledger entries over {} periods, {} metric observations",
            entries.len(),
            available_periods(&entries).len(),
            metrics.len()
        );

        self.data = Some(LedgerData {
            entries,
            metrics,
            metrics_source,
        });
        Ok(())
    }

    /// Reload the snapshot; the previous data stays in place when loading fails
    pub async fn reload(&mut self) -> CoreResult<()> {
        let previous = self.data.take();
        match self.load().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.data = previous;
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn data(&self) -> CoreResult<&LedgerData> {
        self.data.as_ref().ok_or(CoreError::NotLoaded)
    }

    pub fn entries(&self) -> CoreResult<&[LedgerEntry]> {
        Ok(&self.data()?.entries)
    }

    pub fn metrics_source(&self) -> CoreResult<MetricsSource> {
        Ok(self.data()?.metrics_source)
    }

    /// Distinct ledger periods, chronological
    pub fn periods(&self) -> CoreResult<Vec<NaiveDate>> {
        Ok(available_periods(&self.data()?.entries))
    }

    pub fn latest_period(&self) -> CoreResult<Option<NaiveDate>> {
        Ok(self.periods()?.last().copied())
    }

    /// The last `reports.default_period_count` periods
    pub fn default_range(&self) -> CoreResult<Option<PeriodRange>> {
        let periods = self.periods()?;
        Ok(PeriodRange::trailing(&periods, self.config.reports.default_period_count))
    }

    pub fn default_statement(&self) -> StatementKind {
        self.config
            .reports
            .default_statement
            .parse()
            .unwrap_or_default()
    }

    pub fn default_metric(&self) -> Metric {
        self.config
            .reports
            .default_metric
            .parse()
            .unwrap_or(Metric::Revenue)
    }

    /// Build a statement over `range`
    pub fn statement(&self, kind: StatementKind, range: PeriodRange) -> CoreResult<StatementTable> {
        let data = self.data()?;
        build_statement(kind, &data.entries, range.from, range.to)
    }

    pub fn metric_series(&self, metric: Metric) -> CoreResult<MetricSeries> {
        Ok(metric_series(&self.data()?.metrics, metric))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use execportal_loader::{LedgerLoaderTrait, MetricRecord, TrialBalanceRecord};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn record(m: u32, code: &str, description: &str, activity: Decimal, closing: Decimal) -> TrialBalanceRecord {
        TrialBalanceRecord {
            period: month(m),
            gl_account_code: code.to_string(),
            gl_account_description: description.to_string(),
            opening_balance: closing - activity,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            closing_balance: closing,
            activity,
        }
    }

    struct MockLoader {
        trial_balance: Vec<TrialBalanceRecord>,
        metrics: Option<Vec<MetricRecord>>,
        fail_trial_balance: AtomicBool,
    }

    impl MockLoader {
        fn new(metrics: Option<Vec<MetricRecord>>) -> Self {
            let trial_balance = (1..=8)
                .flat_map(|m| {
                    vec![
                        record(m, "4000", "Sales", dec!(-100) * Decimal::from(m), Decimal::ZERO),
                        record(m, "5000", "Materials", dec!(40), Decimal::ZERO),
                        record(m, "1000", "Cash", Decimal::ZERO, dec!(1000) + Decimal::from(m)),
                    ]
                })
                .collect();
            Self {
                trial_balance,
                metrics,
                fail_trial_balance: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl LedgerLoaderTrait for MockLoader {
        async fn load_trial_balance(&self, path: PathBuf) -> Result<Vec<TrialBalanceRecord>, LoadError> {
            if self.fail_trial_balance.load(Ordering::SeqCst) {
                return Err(LoadError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                });
            }
            Ok(self.trial_balance.clone())
        }

        async fn load_performance_metrics(&self, path: PathBuf) -> Result<Vec<MetricRecord>, LoadError> {
            self.metrics.clone().ok_or(LoadError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            })
        }
    }

    async fn loaded(metrics: Option<Vec<MetricRecord>>) -> (Ledger, Arc<MockLoader>) {
        let loader = Arc::new(MockLoader::new(metrics));
        let mut ledger = Ledger::new(Config::default(), loader.clone());
        ledger.load().await.unwrap();
        (ledger, loader)
    }

    #[test]
    fn test_unloaded_ledger() {
        let ledger = Ledger::new(Config::default(), Arc::new(MockLoader::new(None)));
        assert!(!ledger.is_loaded());
        assert!(matches!(ledger.periods(), Err(CoreError::NotLoaded)));
        assert!(matches!(
            ledger.statement(StatementKind::IncomeStatement, PeriodRange::new(month(1), month(1))),
            Err(CoreError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_load_and_default_range() {
        let (ledger, _) = loaded(None).await;
        assert!(ledger.is_loaded());
        assert_eq!(ledger.periods().unwrap().len(), 8);
        assert_eq!(ledger.latest_period().unwrap(), Some(month(8)));
        assert_eq!(
            ledger.default_range().unwrap(),
            Some(PeriodRange::new(month(3), month(8)))
        );
        assert_eq!(ledger.default_statement(), StatementKind::IncomeStatement);
        assert_eq!(ledger.default_metric(), Metric::Revenue);
    }

    #[tokio::test]
    async fn test_statement_through_ledger() {
        let (ledger, _) = loaded(None).await;
        let table = ledger
            .statement(StatementKind::IncomeStatement, PeriodRange::new(month(1), month(2)))
            .unwrap();
        let net_profit = table.subtotal(SubtotalLine::NetProfit).unwrap();
        assert_eq!(net_profit.values, vec![dec!(60), dec!(160)]);

        let table = ledger
            .statement(StatementKind::BalanceSheet, PeriodRange::new(month(8), month(8)))
            .unwrap();
        assert_eq!(table.subtotal(SubtotalLine::TotalAssets).unwrap().values, vec![dec!(1008)]);
    }

    #[tokio::test]
    async fn test_missing_metrics_file_derives_metrics() {
        let (ledger, _) = loaded(None).await;
        assert_eq!(ledger.metrics_source().unwrap(), MetricsSource::Derived);
        let series = ledger.metric_series(Metric::GrossProfit).unwrap();
        assert_eq!(series.points.len(), 8);
        assert_eq!(series.points[0].value, dec!(60));
    }

    #[tokio::test]
    async fn test_metrics_file_is_used_when_present() {
        let metrics = vec![MetricRecord {
            period: month(1),
            metric: "Net Profit".to_string(),
            value: dec!(12.5),
        }];
        let (ledger, _) = loaded(Some(metrics)).await;
        assert_eq!(ledger.metrics_source().unwrap(), MetricsSource::File);
        let series = ledger.metric_series(Metric::NetProfit).unwrap();
        assert_eq!(series.points.len(), 1);
        assert!(ledger.metric_series(Metric::Revenue).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_data() {
        let (mut ledger, loader) = loaded(None).await;
        loader.fail_trial_balance.store(true, Ordering::SeqCst);

        let err = ledger.reload().await.unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound { .. }));
        assert!(ledger.is_loaded());
        assert_eq!(ledger.periods().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_empty_trial_balance_is_rejected() {
        let loader = Arc::new(MockLoader {
            trial_balance: Vec::new(),
            metrics: None,
            fail_trial_balance: AtomicBool::new(false),
        });
        let mut ledger = Ledger::new(Config::default(), loader);
        assert!(matches!(ledger.load().await, Err(CoreError::InvalidFormat { .. })));
        assert!(!ledger.is_loaded());
    }
}
