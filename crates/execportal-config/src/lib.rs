//! Configuration management for execportal
//!
//! This module handles loading, validation, and management of
//! execportal configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV snapshots
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Trial balance file name
    #[serde(default = "default_trial_balance_file")]
    pub trial_balance_file: String,
    /// Performance metrics file name
    #[serde(default = "default_performance_metrics_file")]
    pub performance_metrics_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            trial_balance_file: default_trial_balance_file(),
            performance_metrics_file: default_performance_metrics_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_trial_balance_file() -> String {
    "trial_balance.csv".to_string()
}

fn default_performance_metrics_file() -> String {
    "performance_metrics.csv".to_string()
}

/// Report defaults used when a request carries no selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Statement shown first: income_statement, balance_sheet or cash_flow_statement
    #[serde(default = "default_statement")]
    pub default_statement: String,
    /// Number of trailing periods selected by default
    #[serde(default = "default_period_count")]
    pub default_period_count: usize,
    /// Metric shown first on the performance page
    #[serde(default = "default_metric")]
    pub default_metric: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_statement: default_statement(),
            default_period_count: default_period_count(),
            default_metric: default_metric(),
        }
    }
}

fn default_statement() -> String {
    "income_statement".to_string()
}

fn default_period_count() -> usize {
    6
}

fn default_metric() -> String {
    "revenue".to_string()
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const STATEMENT_KINDS: [&str; 3] = ["income_statement", "balance_sheet", "cash_flow_statement"];
const METRICS: [&str; 6] = [
    "revenue",
    "gross_profit",
    "operating_expenses",
    "net_profit",
    "gross_profit_ratio",
    "operating_expense_ratio",
];
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Report defaults
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.trial_balance_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "data.trial_balance_file".to_string(),
            });
        }

        if !STATEMENT_KINDS.contains(&self.reports.default_statement.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "reports.default_statement".to_string(),
                reason: format!("Must be one of: {}", STATEMENT_KINDS.join(", ")),
            });
        }

        let metric = self.reports.default_metric.trim().to_lowercase().replace(['-', ' '], "_");
        if !METRICS.contains(&metric.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "reports.default_metric".to_string(),
                reason: format!("Must be one of: {}", METRICS.join(", ")),
            });
        }

        if self.reports.default_period_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reports.default_period_count".to_string(),
                reason: "At least one period must be selected by default".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the trial balance CSV
    pub fn trial_balance_path(&self) -> PathBuf {
        self.data.path.join(&self.data.trial_balance_file)
    }

    /// Full path to the performance metrics CSV
    pub fn performance_metrics_path(&self) -> PathBuf {
        self.data.path.join(&self.data.performance_metrics_file)
    }
}

// ==================== Tests ====================
