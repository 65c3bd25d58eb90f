#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/banksia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;

pub use config::MetricsConfig;
pub use engine::MetricEngine;
pub use error::{MetricsError, Result};

// Re-export registry types for convenience
pub use registry::{
    MetricCategory, MetricInfo, MetricWindow, available_metrics, derived_columns,
    get_metric_info, metrics_by_category,
};
