//! Per-instrument summary statistics.
//!
//! This module reduces an augmented series to a single row of scalar
//! statistics and collects those rows into the run's summary table.

use banksia_data::AugmentedSeries;
use banksia_data::columns::{CUMULATIVE_RETURN, DAILY_RETURN, DRAWDOWN, VOLATILITY_ANNUAL};
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Format of the per-record computation timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the run timestamp embedded in summary file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Summary statistics for one instrument.
///
/// Every statistic is optional: a series too short to fill the annual window
/// has no annual volatility, and that is reported as missing rather than zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRecord {
    /// Instrument identifier.
    #[serde(rename = "Ticker")]
    pub ticker: String,

    /// Mean of the daily returns, nulls ignored.
    #[serde(rename = "Mean_Daily_Return")]
    pub mean_daily_return: Option<f64>,

    /// Cumulative return on the last row.
    #[serde(rename = "Final_Cumulative_Return")]
    pub final_cumulative_return: Option<f64>,

    /// Most negative drawdown.
    #[serde(rename = "Max_Drawdown")]
    pub max_drawdown: Option<f64>,

    /// Mean of the annual volatility column, nulls ignored.
    #[serde(rename = "Annual_Volatility")]
    pub annual_volatility: Option<f64>,

    /// Wall-clock time the record was computed.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl SummaryRecord {
    /// Column headers of the summary table, in field order.
    pub const HEADERS: [&'static str; 6] = [
        "Ticker",
        "Mean_Daily_Return",
        "Final_Cumulative_Return",
        "Max_Drawdown",
        "Annual_Volatility",
        "Timestamp",
    ];
}

/// Reduce an augmented series to its summary record.
///
/// `computed_at` is recorded as the provenance timestamp; pass the current
/// local time in production and a fixed value in tests.
///
/// # Errors
///
/// Returns an error if a derived column is missing or not numeric.
pub fn summarize(
    series: &AugmentedSeries,
    computed_at: NaiveDateTime,
) -> PolarsResult<SummaryRecord> {
    let stats = series
        .frame()
        .clone()
        .lazy()
        .select([
            col(DAILY_RETURN).mean().alias(DAILY_RETURN),
            col(CUMULATIVE_RETURN).last().alias(CUMULATIVE_RETURN),
            col(DRAWDOWN).min().alias(DRAWDOWN),
            col(VOLATILITY_ANNUAL).mean().alias(VOLATILITY_ANNUAL),
        ])
        .collect()?;

    let scalar = |name: &str| -> PolarsResult<Option<f64>> {
        Ok(stats.column(name)?.cast(&DataType::Float64)?.f64()?.get(0))
    };

    Ok(SummaryRecord {
        ticker: series.ticker().to_string(),
        mean_daily_return: scalar(DAILY_RETURN)?,
        final_cumulative_return: scalar(CUMULATIVE_RETURN)?,
        max_drawdown: scalar(DRAWDOWN)?,
        annual_volatility: scalar(VOLATILITY_ANNUAL)?,
        timestamp: computed_at.format(TIMESTAMP_FORMAT).to_string(),
    })
}

/// Summary records of every instrument in a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SummaryTable {
    /// Records in the order instruments were analysed.
    pub records: Vec<SummaryRecord>,
}

impl SummaryTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: SummaryRecord) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File name for a table written at `run_at`.
    pub fn file_name(run_at: NaiveDateTime) -> String {
        format!("summary_metrics_{}.csv", run_at.format(FILE_TIMESTAMP_FORMAT))
    }

    /// Render the table for the console.
    pub fn to_ascii_table(&self) -> String {
        fn pct(value: Option<f64>) -> String {
            value.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v * 100.0))
        }

        let mut output = String::new();

        output.push_str(&format!("\nSummary Metrics ({} instruments)\n", self.len()));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<12} {:>14} {:>16} {:>14} {:>14}\n",
            "Ticker", "Mean Daily", "Cumulative", "Max Drawdown", "Annual Vol"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for record in &self.records {
            output.push_str(&format!(
                "{:<12} {:>14} {:>16} {:>14} {:>14}\n",
                record.ticker,
                pct(record.mean_daily_return),
                pct(record.final_cumulative_return),
                pct(record.max_drawdown),
                pct(record.annual_volatility),
            ));
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }
}

impl FromIterator<SummaryRecord> for SummaryTable {
    fn from_iter<I: IntoIterator<Item = SummaryRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
