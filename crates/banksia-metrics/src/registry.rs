//! Metric Registry
//!
//! Catalogue of the derived columns, in computation order.

use banksia_data::columns::{
    CUMULATIVE_RETURN, DAILY_RETURN, DRAWDOWN, ROLLING_30D_RETURN, ROLLING_30D_VOLATILITY,
    VOLATILITY_ANNUAL,
};
use std::fmt;

/// Metric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    /// Return metrics (daily, cumulative, rolling)
    Return,
    /// Volatility metrics (annual, short window)
    Volatility,
    /// Drawdown from the running maximum
    Drawdown,
}

/// Window a metric is evaluated over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricWindow {
    /// Consecutive pair of rows
    Pairwise,
    /// Every row from the start of the series
    Expanding,
    /// Trailing annual window (252 rows by default)
    Annual,
    /// Trailing short window (30 rows by default)
    Short,
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric name (unique identifier)
    pub name: &'static str,
    /// Column written to processed tables
    pub column: &'static str,
    /// Metric category
    pub category: MetricCategory,
    /// Window the metric uses
    pub window: MetricWindow,
    /// Brief description of what the metric measures
    pub description: &'static str,
}

impl fmt::Display for MetricInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<24} {}", self.column, self.description)
    }
}

/// Get all derived metrics, in computation order
pub fn available_metrics() -> Vec<MetricInfo> {
    vec![
        MetricInfo {
            name: "daily_return",
            column: DAILY_RETURN,
            category: MetricCategory::Return,
            window: MetricWindow::Pairwise,
            description: "Simple return versus the previous close",
        },
        MetricInfo {
            name: "cumulative_return",
            column: CUMULATIVE_RETURN,
            category: MetricCategory::Return,
            window: MetricWindow::Expanding,
            description: "Compounded return since the first close",
        },
        MetricInfo {
            name: "volatility_annual",
            column: VOLATILITY_ANNUAL,
            category: MetricCategory::Volatility,
            window: MetricWindow::Annual,
            description: "Annualized std of daily returns over the annual window",
        },
        MetricInfo {
            name: "rolling_30d_volatility",
            column: ROLLING_30D_VOLATILITY,
            category: MetricCategory::Volatility,
            window: MetricWindow::Short,
            description: "Annualized std of daily returns over the short window",
        },
        MetricInfo {
            name: "drawdown",
            column: DRAWDOWN,
            category: MetricCategory::Drawdown,
            window: MetricWindow::Expanding,
            description: "Decline from the running maximum close",
        },
        MetricInfo {
            name: "rolling_30d_return",
            column: ROLLING_30D_RETURN,
            category: MetricCategory::Return,
            window: MetricWindow::Short,
            description: "Sum of daily returns over the short window",
        },
    ]
}

/// Get metrics by category
pub fn metrics_by_category(category: MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.category == category)
        .collect()
}

/// Get metric info by name or column
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics()
        .into_iter()
        .find(|m| m.name == name || m.column == name)
}

/// Column names of the derived metrics, in computation order
pub fn derived_columns() -> Vec<&'static str> {
    available_metrics().iter().map(|m| m.column).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use banksia_data::columns::DERIVED;

    #[test]
    fn test_registry_matches_persisted_columns() {
        assert_eq!(derived_columns(), DERIVED.to_vec());
    }

    #[test]
    fn test_metrics_by_category() {
        let volatility = metrics_by_category(MetricCategory::Volatility);
        assert_eq!(volatility.len(), 2);
        assert!(volatility.iter().all(|m| m.category == MetricCategory::Volatility));

        assert_eq!(metrics_by_category(MetricCategory::Return).len(), 3);
        assert_eq!(metrics_by_category(MetricCategory::Drawdown).len(), 1);
    }

    #[test]
    fn test_get_metric_info() {
        let by_name = get_metric_info("drawdown").unwrap();
        let by_column = get_metric_info("Drawdown").unwrap();
        assert_eq!(by_name.column, by_column.column);
        assert_eq!(by_name.window, MetricWindow::Expanding);

        assert!(get_metric_info("sharpe").is_none());
    }

    #[test]
    fn test_unique_names() {
        let metrics = available_metrics();
        let mut names: Vec<_> = metrics.iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), metrics.len());
    }
}
