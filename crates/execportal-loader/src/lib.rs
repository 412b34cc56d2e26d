//! Trial balance and performance metric loading
//!
//! Reads the CSV snapshots the dashboard is built from.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub mod reader;
pub mod types;

pub use error::LoadError;
pub use reader::{parse_amount, parse_performance_metrics, parse_period, parse_trial_balance};
pub use types::{MetricRecord, TrialBalanceRecord};

// ==================== Loader Trait ====================

/// Loader reference type
pub type LoaderRef = Arc<dyn LedgerLoaderTrait>;

/// Trait for snapshot loaders
#[async_trait]
pub trait LedgerLoaderTrait: Send + Sync {
    /// Load the trial balance, sorted by period
    async fn load_trial_balance(&self, path: PathBuf) -> Result<Vec<TrialBalanceRecord>, LoadError>;

    /// Load the performance metric observations, sorted by period
    async fn load_performance_metrics(&self, path: PathBuf) -> Result<Vec<MetricRecord>, LoadError>;
}

/// Default loader reading CSV files from disk
#[derive(Debug, Default)]
pub struct DefaultCsvLoader;

async fn read_file(path: &PathBuf) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
        } else {
            LoadError::IoError(e)
        }
    })
}

#[async_trait]
impl LedgerLoaderTrait for DefaultCsvLoader {
    async fn load_trial_balance(&self, path: PathBuf) -> Result<Vec<TrialBalanceRecord>, LoadError> {
        let content = read_file(&path).await?;
        log::info!(target: "execportal::loader", "loading trial balance from {}", path.display());
        parse_trial_balance(&content)
    }

    async fn load_performance_metrics(&self, path: PathBuf) -> Result<Vec<MetricRecord>, LoadError> {
        let content = read_file(&path).await?;
        log::info!(target: "execportal::loader", "loading performance metrics from {}", path.display());
        parse_performance_metrics(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_trial_balance_from_disk() {
        let path = std::env::temp_dir().join(format!("execportal-tb-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "period,gl_account_code,gl_account_description,opening_balance,debit,credit,closing_balance,activity\n\
             2024-03-01,1000,Cash,0,500,0,500,500\n",
        )
        .unwrap();

        let records = DefaultCsvLoader.load_trial_balance(path.clone()).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gl_account_description, "Cash");
    }

    #[tokio::test]
    async fn test_missing_file_is_file_not_found() {
        let path = PathBuf::from("/nonexistent/execportal/trial_balance.csv");
        let err = DefaultCsvLoader.load_trial_balance(path).await.unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}
