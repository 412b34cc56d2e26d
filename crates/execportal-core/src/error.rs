//! Error types for execportal-core
//!
//! This module provides error handling for statement building and ledger
//! loading, including error codes, detailed messages, and suggestions.

use execportal_loader::LoadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Ledger not loaded
    NotLoaded,
    /// Period range outside the ledger's periods
    InvalidPeriodRange,
    /// Unknown statement selector
    UnknownStatement,
    /// Unknown metric selector
    UnknownMetric,
    /// Parse error
    ParseError,
    /// IO error
    IoError,
    /// File not found
    FileNotFound,
    /// Invalid data format
    InvalidFormat,
    /// Operation not supported
    NotSupported,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::InvalidPeriodRange => write!(f, "INVALID_PERIOD_RANGE"),
            ErrorCode::UnknownStatement => write!(f, "UNKNOWN_STATEMENT"),
            ErrorCode::UnknownMetric => write!(f, "UNKNOWN_METRIC"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::NotSupported => write!(f, "NOT_SUPPORTED"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for execportal-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Ledger not loaded")]
    NotLoaded,

    #[error("Invalid period range {from} to {to}: {reason}")]
    InvalidPeriodRange { from: String, to: String, reason: String },

    #[error("Unknown statement: {name}")]
    UnknownStatement { name: String },

    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    #[error("Parse error: {message}")]
    ParseError { message: String, line: Option<u64> },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::InvalidPeriodRange { .. } => ErrorCode::InvalidPeriodRange,
            CoreError::UnknownStatement { .. } => ErrorCode::UnknownStatement,
            CoreError::UnknownMetric { .. } => ErrorCode::UnknownMetric,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::IoError { .. } => ErrorCode::IoError,
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::NotSupported { .. } => ErrorCode::NotSupported,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::InvalidPeriodRange { .. } => ErrorSeverity::Warning,
            CoreError::UnknownStatement { .. } => ErrorSeverity::Info,
            CoreError::UnknownMetric { .. } => ErrorSeverity::Info,
            CoreError::NotSupported { .. } => ErrorSeverity::Info,
            CoreError::ParseError { .. }
            | CoreError::IoError { .. }
            | CoreError::FileNotFound { .. }
            | CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details.with_suggestion(
                    "Check that the trial balance file exists and reload via /api/reload.".to_string()
                );
            }
            CoreError::InvalidPeriodRange { .. } => {
                details = details.with_suggestion(
                    "Pick both ends of the range from /api/periods.".to_string()
                );
            }
            CoreError::UnknownStatement { .. } => {
                details = details.with_suggestion(
                    "Use income_statement, balance_sheet or cash_flow_statement.".to_string()
                );
            }
            CoreError::UnknownMetric { .. } => {
                details = details.with_suggestion(
                    "Use the /api/metrics endpoint to list available metrics.".to_string()
                );
            }
            CoreError::ParseError { message, line } => {
                details = details.with_detail(serde_json::json!({
                    "parse_message": message,
                    "line": line,
                }));
                details = details.with_suggestion(
                    "Check the CSV row for non-numeric amounts or malformed periods.".to_string()
                );
            }
            CoreError::InvalidFormat { .. } => {
                details = details.with_suggestion(
                    "Ensure the CSV header carries every required column.".to_string()
                );
            }
            CoreError::FileNotFound { .. } => {
                details = details.with_suggestion(
                    "Check data.path and the file names in the config.".to_string()
                );
            }
            CoreError::NotSupported { operation } => {
                details = details.with_suggestion(
                    format!("The operation '{}' is not yet implemented.", operation)
                );
            }
            CoreError::IoError { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<LoadError> for CoreError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::FileNotFound { path } => CoreError::FileNotFound { path },
            LoadError::MissingColumn { .. } => CoreError::InvalidFormat {
                message: error.to_string(),
            },
            LoadError::InvalidRecord { line, message } => CoreError::ParseError {
                message,
                line: Some(line),
            },
            LoadError::Csv(ref e) => CoreError::ParseError {
                message: e.to_string(),
                line: error.line(),
            },
            LoadError::IoError(e) => CoreError::IoError {
                message: e.to_string(),
            },
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => log::error!(
                target: "execportal::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "execportal::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Info => log::info!(
                target: "execportal::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
        }
    }
}

// ==================== Tests ====================
