//! Error types for metric computation.

use thiserror::Error;

/// Result type for metric computation.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while deriving metrics.
///
/// Short history is not an error: windows without enough rows yield nulls.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Error wrapping the result as a series
    #[error("Data error: {0}")]
    Data(#[from] banksia_data::DataError),

    /// Input table lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Window too short to hold a sample standard deviation
    #[error("Invalid {name} window of {window} rows (minimum is 2)")]
    InvalidWindow {
        /// Which window is invalid
        name: &'static str,
        /// Configured window length
        window: usize,
    },

    /// Annualization base that is not a positive finite number
    #[error("Invalid trading days per year: {0}")]
    InvalidAnnualization(f64),
}
