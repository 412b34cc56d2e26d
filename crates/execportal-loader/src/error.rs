//! Error types for execportal-loader

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl LoadError {
    /// Line number of the offending record, when known
    pub fn line(&self) -> Option<u64> {
        match self {
            LoadError::InvalidRecord { line, .. } => Some(*line),
            LoadError::Csv(e) => e.position().map(|p| p.line()),
            _ => None,
        }
    }
}
