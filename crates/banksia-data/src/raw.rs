//! Raw price table loading.

use crate::columns::{CLOSE, REQUIRED};
use crate::discover::ticker_from_path;
use crate::error::Result;
use crate::frame::{cast_float_columns, parse_date_column, read_text_csv, require_columns};
use crate::series::PriceSeries;
use std::path::Path;
use tracing::debug;

/// Loads raw per-instrument price tables.
///
/// Raw exports carry a repeated ticker label row directly under the column
/// header (`Date,Close,High,...` followed by `,IEV,IEV,...`). That row is
/// dropped unconditionally; every later row is treated as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPriceLoader {
    skip_rows_after_header: usize,
}

impl RawPriceLoader {
    /// Loader for the standard raw layout (one label row after the header).
    pub const fn new() -> Self {
        Self {
            skip_rows_after_header: 1,
        }
    }

    /// Loader that skips a different number of rows below the header.
    pub const fn with_skip_rows(skip_rows_after_header: usize) -> Self {
        Self {
            skip_rows_after_header,
        }
    }

    /// Number of rows dropped below the header.
    pub const fn skip_rows_after_header(&self) -> usize {
        self.skip_rows_after_header
    }

    /// Read one raw table into a [`PriceSeries`].
    ///
    /// The instrument identifier is the file name without its extension.
    /// `Date` must parse for every row; a non-numeric `Close` becomes null.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, lacks `Date` or `Close`,
    /// or contains a malformed date.
    pub fn load(&self, path: &Path) -> Result<PriceSeries> {
        let ticker = ticker_from_path(path)?;
        let mut frame = read_text_csv(path, self.skip_rows_after_header)?;

        require_columns(&frame, &path.display().to_string(), &REQUIRED)?;
        parse_date_column(&mut frame, path)?;
        cast_float_columns(&mut frame, &[CLOSE])?;

        debug!(
            ticker = %ticker,
            rows = frame.height(),
            path = %path.display(),
            "loaded raw price table"
        );

        PriceSeries::new(ticker, frame)
    }
}

impl Default for RawPriceLoader {
    fn default() -> Self {
        Self::new()
    }
}
