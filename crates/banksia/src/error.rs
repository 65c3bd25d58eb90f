//! Pipeline errors.

use banksia_data::DataError;
use banksia_metrics::MetricsError;
use banksia_output::ReportError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by a pipeline stage.
///
/// Inside a stage these describe a single instrument's failure and are
/// collected rather than returned; a stage only returns one when the
/// directories themselves cannot be read or written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or storing a table failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Metric computation failed.
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// Writing charts or the summary failed.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Summary statistics could not be computed.
    #[error("Summary error: {0}")]
    Summary(#[from] PolarsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
