//! Window and annualization settings.

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the metric engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Rows in the annual volatility window (default: 252)
    pub annual_window: usize,
    /// Rows in the short volatility and return windows (default: 30)
    pub short_window: usize,
    /// Trading days per year for annualization (default: 252)
    pub trading_days_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            annual_window: 252,
            short_window: 30,
            trading_days_per_year: 252.0,
        }
    }
}

impl MetricsConfig {
    /// Factor that scales a daily standard deviation to a yearly one.
    pub fn annualization_factor(&self) -> f64 {
        self.trading_days_per_year.sqrt()
    }

    /// Check that both windows can hold a sample standard deviation.
    ///
    /// # Errors
    ///
    /// Returns an error for windows under two rows or a non-positive annualization base.
    pub fn validate(&self) -> Result<()> {
        for (name, window) in [
            ("annual", self.annual_window),
            ("short", self.short_window),
        ] {
            if window < 2 {
                return Err(MetricsError::InvalidWindow { name, window });
            }
        }

        if !(self.trading_days_per_year.is_finite() && self.trading_days_per_year > 0.0) {
            return Err(MetricsError::InvalidAnnualization(
                self.trading_days_per_year,
            ));
        }

        Ok(())
    }
}
