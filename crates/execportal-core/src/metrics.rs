//! Performance metrics: named monthly series for the explorer chart

use crate::error::{CoreError, CoreResult};
use crate::models::{LedgerEntry, MetricObservation};
use crate::statements::build_income_statement;
use crate::time::available_periods;
use crate::types::SubtotalLine;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Explorer metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    GrossProfit,
    OperatingExpenses,
    NetProfit,
    GrossProfitRatio,
    OperatingExpenseRatio,
}

impl Metric {
    /// Picker options in display order
    pub fn all() -> [Metric; 6] {
        [
            Metric::Revenue,
            Metric::GrossProfit,
            Metric::OperatingExpenses,
            Metric::NetProfit,
            Metric::GrossProfitRatio,
            Metric::OperatingExpenseRatio,
        ]
    }

    /// Name as it appears in the metrics file
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::GrossProfit => "Gross Profit",
            Metric::OperatingExpenses => "Operating Expenses",
            Metric::NetProfit => "Net Profit",
            Metric::GrossProfitRatio => "Gross Profit Ratio",
            Metric::OperatingExpenseRatio => "Operating Expense Ratio",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::GrossProfit => "gross_profit",
            Metric::OperatingExpenses => "operating_expenses",
            Metric::NetProfit => "net_profit",
            Metric::GrossProfitRatio => "gross_profit_ratio",
            Metric::OperatingExpenseRatio => "operating_expense_ratio",
        }
    }

    /// Chart and table formatting
    pub fn format(&self) -> MetricFormat {
        let kind = match self {
            Metric::GrossProfitRatio | Metric::OperatingExpenseRatio => ValueFormat::Percent,
            _ => ValueFormat::Currency,
        };
        MetricFormat {
            kind,
            axis_decimals: 0,
            tooltip_decimals: 2,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Metric::all()
            .into_iter()
            .find(|m| m.slug() == normalized)
            .ok_or_else(|| CoreError::UnknownMetric { name: s.to_string() })
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Currency,
    /// Value is a ratio, shown multiplied by 100
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFormat {
    pub kind: ValueFormat,
    /// Decimals on axis ticks
    pub axis_decimals: u32,
    /// Decimals in tooltips and the data table
    pub tooltip_decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub period: NaiveDate,
    pub value: Decimal,
}

/// One metric's values over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub label: String,
    pub format: MetricFormat,
    /// Chronological
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.value).min()
    }

    pub fn max(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.value).max()
    }

    pub fn latest(&self) -> Option<&MetricPoint> {
        self.points.last()
    }
}

/// Select `metric` out of the loaded observations.
///
/// Names match case-insensitively. Points are sorted by period.
pub fn metric_series(observations: &[MetricObservation], metric: Metric) -> MetricSeries {
    let wanted = metric.label().to_lowercase();
    let mut points: Vec<MetricPoint> = observations
        .iter()
        .filter(|o| o.metric.trim().to_lowercase() == wanted)
        .map(|o| MetricPoint {
            period: o.period,
            value: o.value,
        })
        .collect();
    points.sort_by_key(|p| p.period);

    MetricSeries {
        metric,
        label: metric.label().to_string(),
        format: metric.format(),
        points,
    }
}

/// Compute every metric from the ledger's income statement.
///
/// Ratios are relative to Total Revenue and are skipped for periods
/// without revenue.
pub fn derive_metrics(entries: &[LedgerEntry]) -> CoreResult<Vec<MetricObservation>> {
    let periods = available_periods(entries);
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Ok(Vec::new());
    };
    let statement = build_income_statement(entries, *first, *last)?;

    let values_of = |line: SubtotalLine| -> CoreResult<Vec<Decimal>> {
        statement
            .subtotal(line)
            .map(|row| row.values.clone())
            .ok_or_else(|| CoreError::InvalidFormat {
                message: format!("income statement has no {} line", line.label()),
            })
    };
    let revenue = values_of(SubtotalLine::TotalRevenue)?;
    let gross_profit = values_of(SubtotalLine::GrossProfit)?;
    let operating_expenses = values_of(SubtotalLine::TotalOperatingExpenses)?;
    let net_profit = values_of(SubtotalLine::NetProfit)?;

    let mut observations = Vec::with_capacity(statement.periods.len() * Metric::all().len());
    for (column, period) in statement.periods.iter().enumerate() {
        let mut push = |metric: Metric, value: Decimal| {
            observations.push(MetricObservation {
                period: *period,
                metric: metric.label().to_string(),
                value,
            });
        };
        push(Metric::Revenue, revenue[column]);
        push(Metric::GrossProfit, gross_profit[column]);
        push(Metric::OperatingExpenses, operating_expenses[column]);
        push(Metric::NetProfit, net_profit[column]);
        if !revenue[column].is_zero() {
            push(Metric::GrossProfitRatio, gross_profit[column] / revenue[column]);
            push(Metric::OperatingExpenseRatio, operating_expenses[column] / revenue[column]);
        }
    }

    log::debug!(
        target: "execportal::metrics",
        "derived {} metric observations over {} periods",
        observations.len(),
        statement.periods.len()
    );
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn observation(m: u32, metric: &str, value: Decimal) -> MetricObservation {
        MetricObservation {
            period: month(m),
            metric: metric.to_string(),
            value,
        }
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("revenue".parse::<Metric>().unwrap(), Metric::Revenue);
        assert_eq!("Gross Profit Ratio".parse::<Metric>().unwrap(), Metric::GrossProfitRatio);
        assert_eq!("operating-expenses".parse::<Metric>().unwrap(), Metric::OperatingExpenses);
        assert!(matches!(
            "ebitda".parse::<Metric>(),
            Err(CoreError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn test_metric_format() {
        assert_eq!(Metric::NetProfit.format().kind, ValueFormat::Currency);
        assert_eq!(Metric::OperatingExpenseRatio.format().kind, ValueFormat::Percent);
        assert_eq!(Metric::Revenue.format().axis_decimals, 0);
        assert_eq!(Metric::Revenue.format().tooltip_decimals, 2);
    }

    #[test]
    fn test_metric_series_filters_and_sorts() {
        let observations = vec![
            observation(3, "Revenue", dec!(300)),
            observation(1, "revenue", dec!(100)),
            observation(2, "Net Profit", dec!(20)),
            observation(2, "REVENUE", dec!(200)),
        ];
        let series = metric_series(&observations, Metric::Revenue);

        assert_eq!(series.label, "Revenue");
        let periods: Vec<_> = series.points.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![month(1), month(2), month(3)]);
        assert_eq!(series.min(), Some(dec!(100)));
        assert_eq!(series.max(), Some(dec!(300)));
        assert_eq!(series.latest().unwrap().value, dec!(300));
    }

    #[test]
    fn test_metric_series_empty() {
        let series = metric_series(&[], Metric::GrossProfitRatio);
        assert!(series.is_empty());
        assert_eq!(series.min(), None);
        assert!(series.latest().is_none());
    }

    #[test]
    fn test_derive_metrics() {
        let entries = vec![
            LedgerEntry::new(month(1), "4000", "Sales", dec!(-200), Decimal::ZERO),
            LedgerEntry::new(month(1), "5000", "Materials", dec!(50), Decimal::ZERO),
            LedgerEntry::new(month(1), "6000", "Salaries", dec!(100), Decimal::ZERO),
            LedgerEntry::new(month(2), "1000", "Cash", Decimal::ZERO, dec!(10)),
        ];
        let observations = derive_metrics(&entries).unwrap();

        let revenue = metric_series(&observations, Metric::Revenue);
        assert_eq!(revenue.points.len(), 2);
        assert_eq!(revenue.points[0].value, dec!(200));

        let net_profit = metric_series(&observations, Metric::NetProfit);
        assert_eq!(net_profit.points[0].value, dec!(50));

        let ratio = metric_series(&observations, Metric::GrossProfitRatio);
        assert_eq!(ratio.points.len(), 1);
        assert_eq!(ratio.points[0].value, dec!(0.75));

        let ratio = metric_series(&observations, Metric::OperatingExpenseRatio);
        assert_eq!(ratio.points[0].value, dec!(0.5));
    }

    #[test]
    fn test_derive_metrics_empty_ledger() {
        assert!(derive_metrics(&[]).unwrap().is_empty());
    }
}
