//! Directory layout of a pipeline run.

use banksia_data::ProcessedStore;
use banksia_output::Reporter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Raw tables directory, relative to the root.
pub const RAW_DIR: &str = "data";
/// Processed tables directory, relative to the root.
pub const PROCESSED_DIR: &str = "data/processed";
/// Chart directory, relative to the root.
pub const PLOTS_DIR: &str = "plots";
/// Summary directory, relative to the root.
pub const RESULTS_DIR: &str = "results";

/// Where each stage reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Raw per-instrument price tables.
    pub raw_dir: PathBuf,
    /// Processed per-instrument tables.
    pub processed_dir: PathBuf,
    /// Per-instrument charts.
    pub plots_dir: PathBuf,
    /// Run summary tables.
    pub results_dir: PathBuf,
}

impl Layout {
    /// Standard layout under `root`.
    ///
    /// ```
    /// use banksia::Layout;
    ///
    /// let layout = Layout::from_root("/srv/markets");
    /// assert!(layout.processed_dir.ends_with("data/processed"));
    /// ```
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            raw_dir: root.join(RAW_DIR),
            processed_dir: root.join(PROCESSED_DIR),
            plots_dir: root.join(PLOTS_DIR),
            results_dir: root.join(RESULTS_DIR),
        }
    }

    /// Create the output directories if they do not exist.
    ///
    /// The raw directory is an input and is never created.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.processed_dir, &self.plots_dir, &self.results_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Store over the processed directory.
    pub fn store(&self) -> ProcessedStore {
        ProcessedStore::new(&self.processed_dir)
    }

    /// Reporter writing into the chart and summary directories.
    pub fn reporter(&self) -> Reporter {
        Reporter::new(&self.plots_dir, &self.results_dir)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::from_root(".")
    }
}
