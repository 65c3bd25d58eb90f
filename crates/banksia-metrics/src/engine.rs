//! Metric Engine
//!
//! Extends a closing price series with return, volatility and drawdown columns.
//! Every statistic is causal: the value at row `t` depends on rows `..=t` only.

use crate::config::MetricsConfig;
use crate::error::{MetricsError, Result};
use banksia_data::columns::{
    CLOSE, CUMULATIVE_RETURN, DAILY_RETURN, DATE, DRAWDOWN, REQUIRED, ROLLING_30D_RETURN,
    ROLLING_30D_VOLATILITY, VOLATILITY_ANNUAL,
};
use banksia_data::{AugmentedSeries, PriceSeries};
use polars::prelude::*;

/// Derives the metric columns from `Date` and `Close`.
#[derive(Debug, Clone, Default)]
pub struct MetricEngine {
    config: MetricsConfig,
}

/// Trailing window of `window` rows, defined once it holds `window - 1` values.
///
/// The first return of a series is always null, so the first window that
/// spans `window` rows holds one value fewer.
fn trailing(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window - 1,
        ..Default::default()
    }
}

/// Rows whose return is missing because a close is missing.
///
/// The undefined return of the first row is not a gap.
fn return_gap() -> Expr {
    col(CLOSE)
        .is_null()
        .or(col(CLOSE).is_null().shift(lit(1)).fill_null(lit(false)))
}

/// Null out a window statistic wherever its window contains a return gap.
fn gap_free(stat: Expr, window: usize) -> Expr {
    let gaps = return_gap()
        .cast(DataType::Int32)
        .rolling_sum(RollingOptionsFixedWindow {
            window_size: window,
            min_periods: 1,
            ..Default::default()
        });
    when(gaps.eq(lit(0))).then(stat).otherwise(lit(NULL))
}

impl MetricEngine {
    /// Engine with the standard 252/30-row windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom windows.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`MetricsConfig::validate`].
    pub fn with_config(config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Append the derived columns to a lazy frame holding `Date` and `Close`.
    ///
    /// Rows are sorted by `Date` first; other columns pass through unchanged.
    pub fn compute_lazy(&self, data: LazyFrame) -> LazyFrame {
        let annualization = self.config.annualization_factor();
        let annual_window = self.config.annual_window;
        let short_window = self.config.short_window;
        let annual = trailing(annual_window);
        let short = trailing(short_window);

        let prev_close = col(CLOSE).shift(lit(1));
        let running_max = col(CLOSE).cum_max(false);

        data.sort([DATE], Default::default())
            .with_column(col(CLOSE).cast(DataType::Float64))
            .with_column(((col(CLOSE) - prev_close.clone()) / prev_close).alias(DAILY_RETURN))
            .with_columns([
                // Nulls are skipped by the running product, so the first row stays null
                ((lit(1.0) + col(DAILY_RETURN)).cum_prod(false) - lit(1.0))
                    .alias(CUMULATIVE_RETURN),
                gap_free(
                    col(DAILY_RETURN).rolling_std(annual) * lit(annualization),
                    annual_window,
                )
                .alias(VOLATILITY_ANNUAL),
                gap_free(
                    col(DAILY_RETURN).rolling_std(short.clone()) * lit(annualization),
                    short_window,
                )
                .alias(ROLLING_30D_VOLATILITY),
                ((col(CLOSE) - running_max.clone()) / running_max).alias(DRAWDOWN),
                gap_free(col(DAILY_RETURN).rolling_sum(short), short_window)
                    .alias(ROLLING_30D_RETURN),
            ])
    }

    /// Compute the derived columns for an in-memory table.
    ///
    /// # Errors
    ///
    /// Returns an error if `Date` or `Close` is missing or Polars fails.
    pub fn compute(&self, frame: &DataFrame) -> Result<DataFrame> {
        if let Some(missing) = REQUIRED
            .iter()
            .find(|name| frame.get_column_index(name).is_none())
        {
            return Err(MetricsError::MissingColumn((*missing).to_string()));
        }

        Ok(self.compute_lazy(frame.clone().lazy()).collect()?)
    }

    /// Turn a price series into an augmented series for the same instrument.
    pub fn augment(&self, series: &PriceSeries) -> Result<AugmentedSeries> {
        let frame = self.compute(series.frame())?;
        Ok(AugmentedSeries::new(series.ticker(), frame)?)
    }
}
