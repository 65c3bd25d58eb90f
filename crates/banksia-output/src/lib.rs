#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/banksia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;
pub mod summary;

pub use chart::{ChartError, ChartSeries, LineChart};
pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{ChartFailure, ChartKind, ChartOutcome, ReportError, Reporter};
pub use summary::{SummaryRecord, SummaryTable, summarize};
