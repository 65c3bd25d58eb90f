//! Processed table storage.
//!
//! One CSV file per instrument, named after the ticker. Writes always replace
//! the whole file.

use crate::columns::{CLOSE, DERIVED, REQUIRED};
use crate::discover::{Instrument, TABLE_EXTENSION, discover_instruments, ticker_from_path};
use crate::error::Result;
use crate::frame::{cast_float_columns, parse_date_column, read_text_csv, require_columns};
use crate::series::AugmentedSeries;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory of processed per-instrument tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedStore {
    dir: PathBuf,
}

impl ProcessedStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the tables.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.{TABLE_EXTENSION}"))
    }

    /// Write an augmented series, replacing any previous file for its ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self, series: &mut AugmentedSeries) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(series.ticker());

        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(series.frame_mut())?;

        debug!(ticker = %series.ticker(), path = %path.display(), "saved processed table");
        Ok(path)
    }

    /// Read the processed table for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, a date is malformed, or a
    /// required or derived column is absent.
    pub fn load(&self, ticker: &str) -> Result<AugmentedSeries> {
        self.load_path(&self.path_for(ticker))
    }

    /// Read a processed table from an explicit path.
    pub fn load_path(&self, path: &Path) -> Result<AugmentedSeries> {
        let ticker = ticker_from_path(path)?;
        let mut frame = read_text_csv(path, 0)?;

        let origin = path.display().to_string();
        require_columns(&frame, &origin, &REQUIRED)?;
        require_columns(&frame, &origin, &DERIVED)?;

        parse_date_column(&mut frame, path)?;
        cast_float_columns(&mut frame, &[CLOSE])?;
        cast_float_columns(&mut frame, &DERIVED)?;

        AugmentedSeries::new(ticker, frame)
    }

    /// Processed tables currently in the store, ordered by ticker.
    ///
    /// A store whose directory does not exist yet is empty.
    pub fn list(&self) -> Result<Vec<Instrument>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        discover_instruments(&self.dir)
    }
}
