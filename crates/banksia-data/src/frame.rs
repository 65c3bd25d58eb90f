//! Conversions between CSV text, Polars frames and calendar dates.
//!
//! Tables are read with every column as text so that a stray label row or a
//! blank cell cannot change the inferred schema. Dates are then parsed with
//! `chrono` (a bad date is an error) and numeric columns are cast to `Float64`
//! non-strictly (a bad number becomes null).

use crate::columns::DATE;
use crate::error::{DataError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

/// Days from 0001-01-01 (day 1) to 1970-01-01, the origin of Polars `Date`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a date cell, accepting plain dates and timestamps (the time part is dropped).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// Build a Polars `Date` series from calendar dates.
pub fn date_series(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

/// Extract the `Date` column of a frame as calendar dates.
pub fn date_values(frame: &DataFrame) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = frame.column(DATE)?.cast(&DataType::Int32)?;
    let dates = days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE)))
        .collect();
    Ok(dates)
}

/// Extract a numeric column as nullable floats.
pub fn float_values(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let values = frame.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Read a CSV file with all columns as text, skipping `skip_after_header` rows below the header.
pub(crate) fn read_text_csv(path: &Path, skip_after_header: usize) -> Result<DataFrame> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows_after_header(skip_after_header)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(frame)
}

/// Fail with [`DataError::MissingColumn`] unless every named column is present.
pub(crate) fn require_columns(frame: &DataFrame, origin: &str, columns: &[&str]) -> Result<()> {
    match columns
        .iter()
        .find(|name| frame.get_column_index(name).is_none())
    {
        Some(missing) => Err(DataError::MissingColumn {
            origin: origin.to_string(),
            column: (*missing).to_string(),
        }),
        None => Ok(()),
    }
}

/// Replace the text `Date` column with a parsed `Date` column.
pub(crate) fn parse_date_column(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let dates = {
        let cells = frame.column(DATE)?.str()?;
        let mut dates = Vec::with_capacity(cells.len());
        for (row, cell) in cells.into_iter().enumerate() {
            let cell = cell.unwrap_or_default();
            let date = parse_date(cell).ok_or_else(|| DataError::Parse {
                path: path.to_path_buf(),
                row,
                value: cell.to_string(),
                expected: "a date",
            })?;
            dates.push(date);
        }
        dates
    };

    frame.with_column(date_series(DATE, &dates)?)?;
    Ok(())
}

/// Cast the named columns to `Float64`; unparsable cells become null.
pub(crate) fn cast_float_columns(frame: &mut DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        let cast = frame.column(name)?.cast(&DataType::Float64)?;
        frame.with_column(cast)?;
    }
    Ok(())
}
