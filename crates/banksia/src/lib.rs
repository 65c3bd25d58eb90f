#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/banksia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use banksia_data as data;
pub use banksia_metrics as metrics;
pub use banksia_output as output;

pub use banksia_metrics::{MetricEngine, MetricsConfig};
pub use banksia_output::Reporter;
pub use config::Layout;
pub use error::{PipelineError, Result};
pub use pipeline::{
    AnalysisReport, InstrumentFailure, RunReport, Stage, analyze_all, analyze_all_at, process_all,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
