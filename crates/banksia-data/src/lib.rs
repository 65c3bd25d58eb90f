#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/banksia/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columns;
pub mod discover;
pub mod error;
pub mod frame;
pub mod raw;
pub mod series;
pub mod store;

pub use discover::{Instrument, discover_instruments};
pub use error::{DataError, Result};
pub use raw::RawPriceLoader;
pub use series::{AugmentedSeries, ColumnStats, PriceRecord, PriceSeries, SeriesDiagnostics};
pub use store::ProcessedStore;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
