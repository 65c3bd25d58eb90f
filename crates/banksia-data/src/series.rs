//! Price series and augmented series tables.

use crate::columns::{CLOSE, DATE, DERIVED, REQUIRED};
use crate::error::Result;
use crate::frame::{date_series, date_values, float_values, require_columns};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fmt;

/// One trading day for one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl PriceRecord {
    /// Create a new price record.
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Time-ordered price table for one instrument.
///
/// Holds at least `Date` (Polars `Date`) and `Close` (`Float64`, nullable);
/// any other raw columns are carried along untouched.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    frame: DataFrame,
}

impl PriceSeries {
    /// Wrap a frame that already has parsed `Date` and `Close` columns.
    pub fn new(ticker: impl Into<String>, frame: DataFrame) -> Result<Self> {
        let ticker = ticker.into();
        require_columns(&frame, &ticker, &REQUIRED)?;
        Ok(Self { ticker, frame })
    }

    /// Build a series from in-memory records.
    ///
    /// # Examples
    ///
    /// ```
    /// use banksia_data::{PriceRecord, PriceSeries};
    /// use chrono::NaiveDate;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    /// let series = PriceSeries::from_records(
    ///     "ABC",
    ///     &[PriceRecord::new(day(2), 100.0), PriceRecord::new(day(3), 102.0)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(series.len(), 2);
    /// assert_eq!(series.ticker(), "ABC");
    /// ```
    pub fn from_records(ticker: impl Into<String>, records: &[PriceRecord]) -> Result<Self> {
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        let closes: Vec<f64> = records.iter().map(|r| r.close).collect();

        let frame = DataFrame::new(vec![
            date_series(DATE, &dates)?.into(),
            Series::new(CLOSE.into(), closes).into(),
        ])?;

        Self::new(ticker, frame)
    }

    /// Instrument identifier.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Underlying table.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the series, returning the underlying table.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Dates in table order.
    pub fn dates(&self) -> Result<Vec<Option<NaiveDate>>> {
        Ok(date_values(&self.frame)?)
    }

    /// Closing prices in table order; null where the raw cell was not numeric.
    pub fn closes(&self) -> Result<Vec<Option<f64>>> {
        Ok(float_values(&self.frame, CLOSE)?)
    }

    /// Shape, schema and per-column statistics for console diagnostics.
    ///
    /// Every column other than `Date` that holds at least one numeric cell
    /// is summarized; text cells count as missing.
    pub fn diagnostics(&self) -> Result<SeriesDiagnostics> {
        let dates = self.dates()?;

        let mut numeric = Vec::new();
        for column in self.frame.get_columns() {
            if column.name().as_str() == DATE {
                continue;
            }
            let values = column.cast(&DataType::Float64)?;
            let values = values.f64()?;
            let count = values.len() - values.null_count();
            if count == 0 && column.name().as_str() != CLOSE {
                continue;
            }
            numeric.push(ColumnStats {
                name: column.name().to_string(),
                count,
                mean: values.mean(),
                min: values.min(),
                max: values.max(),
            });
        }

        Ok(SeriesDiagnostics {
            ticker: self.ticker.clone(),
            rows: self.frame.height(),
            columns: self
                .frame
                .get_columns()
                .iter()
                .map(|c| (c.name().to_string(), c.dtype().to_string()))
                .collect(),
            first_date: dates.iter().flatten().min().copied(),
            last_date: dates.iter().flatten().max().copied(),
            numeric,
        })
    }
}

/// Statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of numeric cells.
    pub count: usize,
    /// Mean of the numeric cells.
    pub mean: Option<f64>,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
}

/// Summary of a loaded price table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDiagnostics {
    /// Instrument identifier.
    pub ticker: String,
    /// Number of data rows.
    pub rows: usize,
    /// Column names with their data types.
    pub columns: Vec<(String, String)>,
    /// Earliest date.
    pub first_date: Option<NaiveDate>,
    /// Latest date.
    pub last_date: Option<NaiveDate>,
    /// Statistics of `Close` and every other column holding numbers, in table order.
    pub numeric: Vec<ColumnStats>,
}

impl SeriesDiagnostics {
    /// Statistics of a named column, if it was summarized.
    pub fn stats(&self, name: &str) -> Option<&ColumnStats> {
        self.numeric.iter().find(|s| s.name == name)
    }

    /// Number of missing or non-numeric closes.
    pub fn close_nulls(&self) -> usize {
        self.stats(CLOSE).map_or(self.rows, |s| self.rows - s.count)
    }
}

impl fmt::Display for SeriesDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());

        writeln!(f, "{}: {} rows", self.ticker, self.rows)?;
        writeln!(f, "  range: {} .. {}", date(self.first_date), date(self.last_date))?;
        writeln!(
            f,
            "  {:<12} {:>8} {:>14} {:>14} {:>14}",
            "column", "count", "mean", "min", "max"
        )?;
        for stats in &self.numeric {
            writeln!(
                f,
                "  {:<12} {:>8} {:>14} {:>14} {:>14}",
                stats.name,
                stats.count,
                opt(stats.mean),
                opt(stats.min),
                opt(stats.max)
            )?;
        }
        write!(f, "  dtypes:")?;
        for (name, dtype) in &self.columns {
            write!(f, " {name}: {dtype};")?;
        }
        Ok(())
    }
}

/// Price table extended with every derived metric column.
#[derive(Debug, Clone)]
pub struct AugmentedSeries {
    ticker: String,
    frame: DataFrame,
}

impl AugmentedSeries {
    /// Wrap a frame holding `Date`, `Close` and all derived columns.
    pub fn new(ticker: impl Into<String>, frame: DataFrame) -> Result<Self> {
        let ticker = ticker.into();
        require_columns(&frame, &ticker, &REQUIRED)?;
        require_columns(&frame, &ticker, &DERIVED)?;
        Ok(Self { ticker, frame })
    }

    /// Instrument identifier.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Underlying table.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Mutable access to the table, used by writers that need `&mut DataFrame`.
    pub const fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Dates in table order.
    pub fn dates(&self) -> Result<Vec<Option<NaiveDate>>> {
        Ok(date_values(&self.frame)?)
    }

    /// Values of a numeric column in table order.
    pub fn values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        Ok(float_values(&self.frame, column)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_records() {
        let series = PriceSeries::from_records(
            "XYZ",
            &[PriceRecord::new(day(2), 10.0), PriceRecord::new(day(3), 11.0)],
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert_eq!(series.dates().unwrap(), vec![Some(day(2)), Some(day(3))]);
        assert_eq!(series.closes().unwrap(), vec![Some(10.0), Some(11.0)]);
    }

    #[test]
    fn test_price_series_requires_close() {
        let frame = DataFrame::new(vec![date_series(DATE, &[day(2)]).unwrap().into()]).unwrap();
        let err = PriceSeries::new("XYZ", frame).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == CLOSE));
    }

    #[test]
    fn test_augmented_series_requires_derived_columns() {
        let series =
            PriceSeries::from_records("XYZ", &[PriceRecord::new(day(2), 10.0)]).unwrap();
        let err = AugmentedSeries::new("XYZ", series.into_frame()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == DERIVED[0]));
    }

    #[test]
    fn test_diagnostics() {
        let series = PriceSeries::from_records(
            "XYZ",
            &[
                PriceRecord::new(day(4), 12.0),
                PriceRecord::new(day(2), 10.0),
                PriceRecord::new(day(3), 11.0),
            ],
        )
        .unwrap();

        let diag = series.diagnostics().unwrap();
        assert_eq!(diag.rows, 3);
        assert_eq!(diag.first_date, Some(day(2)));
        assert_eq!(diag.last_date, Some(day(4)));
        let close = diag.stats(CLOSE).unwrap();
        assert_eq!(close.min, Some(10.0));
        assert_eq!(close.max, Some(12.0));
        assert_eq!(close.mean, Some(11.0));
        assert_eq!(close.count, 3);
        assert_eq!(diag.close_nulls(), 0);
        assert_eq!(diag.columns[0].0, "Date");

        let text = diag.to_string();
        assert!(text.contains("XYZ: 3 rows"));
        assert!(text.contains("2024-01-02 .. 2024-01-04"));
        assert!(text.contains("Close"));
    }

    #[test]
    fn test_diagnostics_cover_every_numeric_column() {
        let frame = df!(
            CLOSE => [Some(10.0), None, Some(14.0)],
            "Volume" => ["100", "300", "200"],
            "Note" => ["a", "b", "c"],
        )
        .unwrap();
        let mut frame = frame;
        frame
            .with_column(date_series(DATE, &[day(2), day(3), day(4)]).unwrap())
            .unwrap();
        let series = PriceSeries::new("XYZ", frame).unwrap();

        let diag = series.diagnostics().unwrap();
        let names: Vec<&str> = diag.numeric.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![CLOSE, "Volume"]);

        let volume = diag.stats("Volume").unwrap();
        assert_eq!(volume.count, 3);
        assert_eq!(volume.mean, Some(200.0));
        assert_eq!(volume.min, Some(100.0));
        assert_eq!(volume.max, Some(300.0));

        assert_eq!(diag.stats(CLOSE).unwrap().count, 2);
        assert_eq!(diag.close_nulls(), 1);
        assert!(diag.stats("Note").is_none());
        assert!(diag.to_string().contains("Volume"));
    }
}
