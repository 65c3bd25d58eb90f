//! Instrument discovery in a data directory.

use crate::error::{DataError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of every price table file.
pub const TABLE_EXTENSION: &str = "csv";

/// A price table file and the instrument it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instrument {
    /// Instrument identifier, the file name without its extension.
    pub ticker: String,
    /// Path of the table file.
    pub path: PathBuf,
}

/// Derive the instrument identifier from a table path.
pub fn ticker_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DataError::InvalidTicker(path.to_path_buf()))
}

/// List the `*.csv` files directly inside `dir`, ordered by ticker.
///
/// Subdirectories and files with other extensions are ignored, so a processed
/// directory nested inside the raw directory does not leak into the listing.
pub fn discover_instruments(dir: &Path) -> Result<Vec<Instrument>> {
    let mut instruments = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
            continue;
        }
        let ticker = ticker_from_path(&path)?;
        instruments.push(Instrument { ticker, path });
    }

    instruments.sort();
    Ok(instruments)
}
