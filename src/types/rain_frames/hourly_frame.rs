// hourly_frame.rs

//! Contains the `HourlyRainFrame` structure for lazy operations on collected
//! hourly rainfall tables.

use crate::error::RainfallError;
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::path::Path;

/// A wrapper around a Polars `LazyFrame` holding hourly rainfall data.
///
/// The wrapped frame uses domain column names: `date` (a timezone-naive
/// `Datetime` column at hour resolution), `rain` and, for multi-city tables,
/// `city`. Collected CSVs carry the raw API timestamp column instead; load
/// them through [`HourlyRainFrame::from_csv`].
#[derive(Clone)]
pub struct HourlyRainFrame {
    /// The underlying Polars LazyFrame containing the hourly data.
    pub frame: LazyFrame,
}

impl HourlyRainFrame {
    /// Wraps a frame already using the domain schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Adapts a frame carrying the raw API columns (`time`, `rain`): renames
    /// the timestamp column to `date` and parses it.
    ///
    /// The archive API emits minute-precision ISO timestamps without
    /// seconds (`2023-01-15T14:00`).
    pub fn from_raw(frame: LazyFrame) -> Self {
        let frame = frame.rename(["time"], ["date"], true).with_column(
            col("date").str().to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                StrptimeOptions {
                    format: Some("%Y-%m-%dT%H:%M".into()),
                    ..Default::default()
                },
                lit("raise"),
            ),
        );
        Self::new(frame)
    }

    /// Lazily scans a collected hourly CSV.
    ///
    /// # Errors
    ///
    /// Returns [`RainfallError::CsvScan`] if the file cannot be opened for
    /// scanning.
    pub fn from_csv(path: &Path) -> Result<Self, RainfallError> {
        let frame = LazyCsvReader::new(path)
            .finish()
            .map_err(|e| RainfallError::CsvScan(path.to_path_buf(), e))?;
        Ok(Self::from_raw(frame))
    }

    /// Filters the hourly data based on a Polars predicate expression.
    pub fn filter(&self, predicate: Expr) -> HourlyRainFrame {
        HourlyRainFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps records within the timestamp range (inclusive on both ends).
    pub fn get_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> HourlyRainFrame {
        self.filter(col("date").gt_eq(lit(start)).and(col("date").lt_eq(lit(end))))
    }

    /// Keeps the record for one exact timestamp. Collecting the result
    /// yields zero or one row per city.
    pub fn get_at(&self, timestamp: NaiveDateTime) -> HourlyRainFrame {
        self.filter(col("date").eq(lit(timestamp)))
    }

    /// Attaches a constant `city` column.
    pub fn with_city(&self, city: &str) -> HourlyRainFrame {
        HourlyRainFrame::new(
            self.frame
                .clone()
                .with_column(lit(city.to_string()).alias("city")),
        )
    }

    /// Mean rainfall across cities for each timestamp, rounded to 2 decimal
    /// places and labelled `Average city`.
    pub fn mean_rainfall(&self) -> HourlyRainFrame {
        let frame = self
            .frame
            .clone()
            .group_by([col("date")])
            .agg([col("rain").mean().round(2)])
            .with_column(lit("Average city").alias("city"))
            .sort(["date"], Default::default());
        HourlyRainFrame::new(frame)
    }
}
