use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("File not found at '{}'", .0.display())]
    InputNotFound(PathBuf),
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),
    #[error("Failed to parse '{}': {reason}", path.display())]
    Unparseable { path: PathBuf, reason: String },
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("DataFrame error: {0}")]
    DataFrameError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<polars::prelude::PolarsError> for AppError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        AppError::DataFrameError(err.to_string())
    }
}

/// Failure to persist a single chart. Never fatal to the run.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("could not write '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}
