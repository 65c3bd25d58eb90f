//! The two pipeline stages.
//!
//! `process_all` turns raw price tables into processed tables; `analyze_all`
//! turns processed tables into charts and a summary. Instruments run one at
//! a time and a failing instrument is recorded in the stage's report while
//! the others continue.

use crate::config::Layout;
use crate::error::{PipelineError, Result};
use banksia_data::{Instrument, RawPriceLoader, discover_instruments};
use banksia_metrics::MetricEngine;
use banksia_output::{ChartFailure, Reporter, SummaryTable, summarize};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Pipeline stage an instrument failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw table to processed table.
    Process,
    /// Processed table to charts and summary record.
    Analyze,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => f.write_str("process"),
            Self::Analyze => f.write_str("analyze"),
        }
    }
}

/// One instrument that could not be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFailure {
    /// Instrument identifier.
    pub ticker: String,
    /// Input file.
    pub path: PathBuf,
    /// Stage the failure happened in.
    pub stage: Stage,
    /// Error description.
    pub message: String,
}

impl InstrumentFailure {
    fn new(instrument: &Instrument, stage: Stage, error: &PipelineError) -> Self {
        Self {
            ticker: instrument.ticker.clone(),
            path: instrument.path.clone(),
            stage,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for InstrumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.ticker, self.path.display(), self.message)
    }
}

/// Outcome of the processing stage.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Tickers written, in processing order.
    pub succeeded: Vec<String>,
    /// Processed tables written.
    pub outputs: Vec<PathBuf>,
    /// Instruments that failed.
    pub failed: Vec<InstrumentFailure>,
}

impl RunReport {
    /// Number of instruments attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether instruments were attempted and every one of them failed.
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Outcome of the analysis stage.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Tickers summarized, in analysis order.
    pub succeeded: Vec<String>,
    /// Instruments that failed.
    pub failed: Vec<InstrumentFailure>,
    /// Charts that could not be written.
    pub chart_failures: Vec<ChartFailure>,
    /// Summary records of the run.
    pub summary: SummaryTable,
    /// Summary file written.
    pub summary_path: PathBuf,
}

impl AnalysisReport {
    /// Number of instruments attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether instruments were attempted and every one of them failed.
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

fn process_one(
    instrument: &Instrument,
    loader: &RawPriceLoader,
    engine: &MetricEngine,
    layout: &Layout,
) -> Result<PathBuf> {
    let series = loader.load(&instrument.path)?;

    let diagnostics = series.diagnostics()?;
    info!("Loaded {}\n{diagnostics}", instrument.path.display());
    info!("First rows of {}:\n{}", instrument.ticker, series.frame().head(Some(5)));

    let mut augmented = engine.augment(&series)?;
    Ok(layout.store().save(&mut augmented)?)
}

/// Process every raw table in the layout's raw directory.
///
/// Each table is loaded, augmented with the derived metric columns and
/// written to the processed directory under the same file name.
///
/// # Errors
///
/// Returns an error only if the raw directory cannot be listed or the
/// processed directory cannot be created. Per-instrument failures are
/// collected in the report.
pub fn process_all(layout: &Layout, engine: &MetricEngine) -> Result<RunReport> {
    let instruments = discover_instruments(&layout.raw_dir)?;
    fs::create_dir_all(&layout.processed_dir)?;
    info!(count = instruments.len(), dir = %layout.raw_dir.display(), "Processing raw tables");

    let loader = RawPriceLoader::new();
    let mut report = RunReport::default();

    for instrument in &instruments {
        match process_one(instrument, &loader, engine, layout) {
            Ok(path) => {
                info!(ticker = %instrument.ticker, path = %path.display(), "Processed and saved");
                report.succeeded.push(instrument.ticker.clone());
                report.outputs.push(path);
            }
            Err(e) => {
                warn!(ticker = %instrument.ticker, error = %e, "Processing failed");
                report
                    .failed
                    .push(InstrumentFailure::new(instrument, Stage::Process, &e));
            }
        }
    }

    Ok(report)
}

/// Analyze every processed table, stamping the run with the current local time.
///
/// # Errors
///
/// See [`analyze_all_at`].
pub fn analyze_all(layout: &Layout, reporter: &Reporter) -> Result<AnalysisReport> {
    analyze_all_at(layout, reporter, Local::now().naive_local())
}

/// Analyze every processed table with an explicit run timestamp.
///
/// Draws the three charts of each instrument, summarizes it, and writes one
/// summary table named after `run_at`. The table is written even when no
/// instrument succeeded.
///
/// # Errors
///
/// Returns an error only if the processed directory cannot be listed or the
/// summary file cannot be written.
pub fn analyze_all_at(
    layout: &Layout,
    reporter: &Reporter,
    run_at: NaiveDateTime,
) -> Result<AnalysisReport> {
    let store = layout.store();
    let instruments = store.list()?;
    info!(count = instruments.len(), dir = %store.dir().display(), "Analyzing processed tables");

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    let mut chart_failures = Vec::new();
    let mut summary = SummaryTable::new();

    for instrument in &instruments {
        let series = match store.load_path(&instrument.path) {
            Ok(series) => series,
            Err(e) => {
                let e = PipelineError::from(e);
                warn!(ticker = %instrument.ticker, error = %e, "Analysis failed");
                failed.push(InstrumentFailure::new(instrument, Stage::Analyze, &e));
                continue;
            }
        };

        let outcome = reporter.render_charts(&series);
        chart_failures.extend(outcome.failed);

        match summarize(&series, run_at) {
            Ok(record) => {
                info!(ticker = %instrument.ticker, charts = outcome.written.len(), "Analyzed");
                succeeded.push(instrument.ticker.clone());
                summary.push(record);
            }
            Err(e) => {
                let e = PipelineError::from(e);
                warn!(ticker = %instrument.ticker, error = %e, "Summary failed");
                failed.push(InstrumentFailure::new(instrument, Stage::Analyze, &e));
            }
        }
    }

    let summary_path = reporter.write_summary(&summary, run_at)?;

    Ok(AnalysisReport {
        succeeded,
        failed,
        chart_failures,
        summary,
        summary_path,
    })
}
