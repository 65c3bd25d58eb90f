//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Malformed field in an input table
    #[error("Parse error in {} at data row {row}: cannot parse {value:?} as {expected}", .path.display())]
    Parse {
        /// File being read
        path: PathBuf,
        /// Zero-based data row (header and skipped rows excluded)
        row: usize,
        /// Offending cell contents
        value: String,
        /// What the cell was expected to contain
        expected: &'static str,
    },

    /// Required column absent from a table
    #[error("Missing column {column:?} in {origin}")]
    MissingColumn {
        /// File path or instrument the table came from
        origin: String,
        /// Name of the missing column
        column: String,
    },

    /// File name does not yield a usable instrument identifier
    #[error("Invalid ticker derived from path: {}", .0.display())]
    InvalidTicker(PathBuf),
}
