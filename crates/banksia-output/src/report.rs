//! Per-instrument charts and the run summary file.

use crate::chart::{
    CUMULATIVE_COLOR, ChartError, DRAWDOWN_COLOR, LINE_COLOR, LineChart, VOLATILITY_COLOR,
};
use crate::export::{ExportError, ExportFormat, Exporter};
use crate::summary::SummaryTable;
use banksia_data::columns::{
    CLOSE, CUMULATIVE_RETURN, DRAWDOWN, ROLLING_30D_VOLATILITY, VOLATILITY_ANNUAL,
};
use banksia_data::{AugmentedSeries, DataError};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Chart rendering error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Summary export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Column extraction error.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The charts drawn for every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Close price with cumulative return.
    PriceCumulative,
    /// Drawdown from the running maximum.
    Drawdown,
    /// Annual and short-window volatility.
    Volatility,
}

impl ChartKind {
    /// All chart kinds, in drawing order.
    pub const ALL: [Self; 3] = [Self::PriceCumulative, Self::Drawdown, Self::Volatility];

    /// File name suffix of this chart.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::PriceCumulative => "price_cumulative",
            Self::Drawdown => "drawdown",
            Self::Volatility => "volatility",
        }
    }

    /// File name of this chart for `ticker`.
    pub fn file_name(&self, ticker: &str) -> String {
        format!("{ticker}_{}.svg", self.suffix())
    }

    fn build(&self, series: &AugmentedSeries) -> Result<LineChart, DataError> {
        let ticker = series.ticker();
        let dates = series.dates()?;
        let chart = match self {
            Self::PriceCumulative => {
                LineChart::new(format!("{ticker} - Price and Cumulative Return"), "Value", dates)
                    .with_series("Close", LINE_COLOR, series.values(CLOSE)?)
                    .with_series(
                        "Cumulative Return",
                        CUMULATIVE_COLOR,
                        series.values(CUMULATIVE_RETURN)?,
                    )
            }
            Self::Drawdown => LineChart::new(format!("{ticker} - Drawdown"), "Drawdown", dates)
                .with_series("Drawdown", DRAWDOWN_COLOR, series.values(DRAWDOWN)?),
            Self::Volatility => {
                LineChart::new(format!("{ticker} - Volatility"), "Volatility", dates)
                    .with_series(
                        "Volatility Annual",
                        VOLATILITY_COLOR,
                        series.values(VOLATILITY_ANNUAL)?,
                    )
                    .with_series(
                        "Rolling 30D Volatility",
                        LINE_COLOR,
                        series.values(ROLLING_30D_VOLATILITY)?,
                    )
            }
        };
        Ok(chart)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A chart that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFailure {
    /// Instrument identifier.
    pub ticker: String,
    /// Chart that failed.
    pub kind: ChartKind,
    /// Error description.
    pub message: String,
}

impl fmt::Display for ChartFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} chart: {}", self.ticker, self.kind, self.message)
    }
}

/// Result of drawing every chart of one instrument.
#[derive(Debug, Clone, Default)]
pub struct ChartOutcome {
    /// Paths of the charts written.
    pub written: Vec<PathBuf>,
    /// Charts that failed.
    pub failed: Vec<ChartFailure>,
}

impl ChartOutcome {
    /// Whether every chart was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes charts and summary files into fixed output directories.
#[derive(Debug, Clone)]
pub struct Reporter {
    plots_dir: PathBuf,
    results_dir: PathBuf,
}

impl Reporter {
    /// Create a reporter writing charts to `plots_dir` and summaries to `results_dir`.
    pub fn new(plots_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            plots_dir: plots_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    /// Chart directory.
    pub fn plots_dir(&self) -> &Path {
        &self.plots_dir
    }

    /// Summary directory.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Path of a chart for `ticker`.
    pub fn chart_path(&self, ticker: &str, kind: ChartKind) -> PathBuf {
        self.plots_dir.join(kind.file_name(ticker))
    }

    /// Draw one chart, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be read or the file cannot be written.
    pub fn render_chart(
        &self,
        series: &AugmentedSeries,
        kind: ChartKind,
    ) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.plots_dir)?;
        let path = self.chart_path(series.ticker(), kind);
        kind.build(series)?.save(&path)?;
        debug!(ticker = series.ticker(), chart = %kind, path = %path.display(), "Chart written");
        Ok(path)
    }

    /// Draw every chart of an instrument.
    ///
    /// A failing chart is recorded and the remaining charts are still drawn.
    pub fn render_charts(&self, series: &AugmentedSeries) -> ChartOutcome {
        let mut outcome = ChartOutcome::default();
        for kind in ChartKind::ALL {
            match self.render_chart(series, kind) {
                Ok(path) => outcome.written.push(path),
                Err(e) => {
                    warn!(ticker = series.ticker(), chart = %kind, error = %e, "Chart failed");
                    outcome.failed.push(ChartFailure {
                        ticker: series.ticker().to_string(),
                        kind,
                        message: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Write the summary table as `summary_metrics_{YYYYMMDD_HHMMSS}.csv`.
    ///
    /// # Errors
    ///
    /// Returns an error if the results directory or file cannot be written.
    pub fn write_summary(
        &self,
        table: &SummaryTable,
        run_at: NaiveDateTime,
    ) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.results_dir)?;
        let path = self.results_dir.join(SummaryTable::file_name(run_at));
        table.export_to_file(&path, ExportFormat::Csv)?;
        info!(records = table.len(), path = %path.display(), "Summary written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banksia_data::{PriceRecord, PriceSeries};
    use banksia_metrics::MetricEngine;
    use chrono::{Duration, NaiveDate};
    use rstest::rstest;
    use tempfile::TempDir;

    fn augmented(ticker: &str, n: usize) -> AugmentedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let records: Vec<PriceRecord> = (0..n)
            .map(|i| {
                PriceRecord::new(
                    start + Duration::days(i as i64),
                    100.0 + ((i as f64) / 5.0).cos() * 4.0,
                )
            })
            .collect();
        let series = PriceSeries::from_records(ticker, &records).unwrap();
        MetricEngine::new().augment(&series).unwrap()
    }

    #[rstest]
    #[case(ChartKind::PriceCumulative, "SPY_price_cumulative.svg")]
    #[case(ChartKind::Drawdown, "SPY_drawdown.svg")]
    #[case(ChartKind::Volatility, "SPY_volatility.svg")]
    fn test_chart_file_names(#[case] kind: ChartKind, #[case] expected: &str) {
        assert_eq!(kind.file_name("SPY"), expected);
    }

    #[test]
    fn test_render_charts_writes_all() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(dir.path().join("plots"), dir.path().join("results"));

        let outcome = reporter.render_charts(&augmented("QQQ", 40));
        assert!(outcome.is_complete());
        assert_eq!(outcome.written.len(), 3);
        for kind in ChartKind::ALL {
            let path = reporter.chart_path("QQQ", kind);
            assert!(path.exists(), "missing {}", path.display());
        }

        let price = std::fs::read_to_string(reporter.chart_path("QQQ", ChartKind::PriceCumulative))
            .unwrap();
        assert!(price.contains(LINE_COLOR));
        assert!(price.contains(CUMULATIVE_COLOR));
    }

    #[test]
    fn test_short_series_volatility_chart_has_no_data() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(dir.path(), dir.path());

        let path = reporter
            .render_chart(&augmented("EWJ", 10), ChartKind::Volatility)
            .unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("No data"));
    }

    #[test]
    fn test_chart_failure_is_isolated() {
        let dir = TempDir::new().unwrap();
        let plots = dir.path().join("plots");
        std::fs::create_dir_all(&plots).unwrap();
        // A directory where the drawdown chart should go makes that write fail
        std::fs::create_dir_all(plots.join("IWM_drawdown.svg")).unwrap();
        let reporter = Reporter::new(&plots, dir.path());

        let outcome = reporter.render_charts(&augmented("IWM", 20));
        assert_eq!(outcome.written.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].kind, ChartKind::Drawdown);
        assert_eq!(outcome.failed[0].ticker, "IWM");
        assert!(reporter.chart_path("IWM", ChartKind::Volatility).exists());
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let reporter = Reporter::new(dir.path().join("plots"), dir.path().join("results"));
        let run_at = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();

        let table: SummaryTable = [crate::summary::summarize(&augmented("SPY", 5), run_at).unwrap()]
            .into_iter()
            .collect();
        let path = reporter.write_summary(&table, run_at).unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("results")
                .join("summary_metrics_20250314_092653.csv")
        );
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Ticker,Mean_Daily_Return"));
        assert!(content.contains("SPY,"));
    }
}
