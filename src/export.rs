//! Flattens one run's results into the four output CSV files.
//!
//! London is written to its own pair of files without a `city` column; every
//! other record gets one and is concatenated per granularity. All output
//! files are overwritten unconditionally on each run.

use crate::collect::{ResultsTable, LONDON_KEY};
use crate::types::granularity::Granularity;
use bon::bon;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LONDON_DAILY: &str = "data/london_daily_rain.csv";
pub const DEFAULT_LONDON_HOURLY: &str = "data/london_hourly_rain.csv";
pub const DEFAULT_ALL_DAILY: &str = "data/all_daily_rain.csv";
pub const DEFAULT_ALL_HOURLY: &str = "data/all_hourly_rain.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No record for '{}' in the collected results", LONDON_KEY)]
    MissingLondon,

    #[error("Failed to combine {granularity} frames for export")]
    Combine {
        granularity: Granularity,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to create output file '{0}'")]
    Create(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),
}

/// Writes a [`ResultsTable`] to the four output CSVs.
///
/// This struct is created through a builder; all four paths are optional and
/// default to the `data/` locations above.
///
/// # Examples
///
/// ```no_run
/// # use rainfall::{Exporter, ResultsTable};
/// # fn run(results: &ResultsTable) -> Result<(), rainfall::ExportError> {
/// let exporter = Exporter::builder()
///     .all_daily("out/daily.csv".into())
///     .build();
/// exporter.write(results)?;
/// # Ok(())
/// # }
/// ```
pub struct Exporter {
    london_daily: PathBuf,
    london_hourly: PathBuf,
    all_daily: PathBuf,
    all_hourly: PathBuf,
}

#[bon]
impl Exporter {
    /// Creates an exporter.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.london_daily(PathBuf)`: Optional. Output for London's daily data.
    /// * `.london_hourly(PathBuf)`: Optional. Output for London's hourly data.
    /// * `.all_daily(PathBuf)`: Optional. Combined daily output for all other cities.
    /// * `.all_hourly(PathBuf)`: Optional. Combined hourly output for all other cities.
    #[builder]
    pub fn new(
        london_daily: Option<PathBuf>,
        london_hourly: Option<PathBuf>,
        all_daily: Option<PathBuf>,
        all_hourly: Option<PathBuf>,
    ) -> Self {
        Self {
            london_daily: london_daily.unwrap_or_else(|| DEFAULT_LONDON_DAILY.into()),
            london_hourly: london_hourly.unwrap_or_else(|| DEFAULT_LONDON_HOURLY.into()),
            all_daily: all_daily.unwrap_or_else(|| DEFAULT_ALL_DAILY.into()),
            all_hourly: all_hourly.unwrap_or_else(|| DEFAULT_ALL_HOURLY.into()),
        }
    }

    /// Writes all four output files, overwriting existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingLondon`] if the results lack the fixed
    /// London entry, and I/O or CSV errors for any file that fails to write.
    /// A failure leaves any files written earlier in the sequence in place;
    /// there is no partial-write protection.
    pub fn write(&self, results: &ResultsTable) -> Result<(), ExportError> {
        let london = results.get(LONDON_KEY).ok_or(ExportError::MissingLondon)?;

        write_frame(london.daily.clone(), &self.london_daily)?;
        println!(
            "London's daily data saved to {}",
            self.london_daily.display()
        );

        write_frame(london.hourly.clone(), &self.london_hourly)?;
        println!(
            "London's hourly data saved to {}",
            self.london_hourly.display()
        );

        write_frame(
            combine_cities(results, Granularity::Daily)?,
            &self.all_daily,
        )?;
        println!("All cities' daily data saved to {}", self.all_daily.display());

        write_frame(
            combine_cities(results, Granularity::Hourly)?,
            &self.all_hourly,
        )?;
        println!(
            "All cities' hourly data saved to {}",
            self.all_hourly.display()
        );

        Ok(())
    }
}

/// Stacks every non-London record at one granularity, annotating each row
/// with its city key.
fn combine_cities(results: &ResultsTable, granularity: Granularity) -> Result<DataFrame, ExportError> {
    let frames: Vec<LazyFrame> = results
        .iter()
        .filter(|(city, _)| *city != LONDON_KEY)
        .map(|(city, record)| {
            let frame = match granularity {
                Granularity::Daily => &record.daily,
                Granularity::Hourly => &record.hourly,
            };
            frame
                .clone()
                .lazy()
                .with_column(lit(city.to_string()).alias("city"))
        })
        .collect();

    concat(frames, UnionArgs::default())
        .and_then(LazyFrame::collect)
        .map_err(|e| ExportError::Combine {
            granularity,
            source: e,
        })
}

fn write_frame(mut df: DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path).map_err(|e| ExportError::Create(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .map_err(|e| ExportError::CsvWrite(path.to_path_buf(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rain_data::fetcher::RainRecord;

    fn record(city_marker: f64) -> RainRecord {
        let daily = DataFrame::new(vec![
            Column::new("time".into(), ["2023-01-01", "2023-01-02"]),
            Column::new("rain_sum".into(), [city_marker, city_marker + 0.5]),
        ])
        .unwrap();
        let hourly = DataFrame::new(vec![
            Column::new("time".into(), ["2023-01-01T00:00", "2023-01-01T01:00"]),
            Column::new("rain".into(), [0.0, city_marker]),
        ])
        .unwrap();
        RainRecord { daily, hourly }
    }

    fn results() -> ResultsTable {
        let mut results = ResultsTable::new();
        results.insert(LONDON_KEY, record(1.0));
        results.insert("NO,Oslo", record(2.0));
        results.insert("SE,Stockholm", record(3.0));
        results
    }

    fn read_csv(path: &Path) -> DataFrame {
        CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .unwrap()
            .finish()
            .unwrap()
    }

    #[test]
    fn writes_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::builder()
            .london_daily(dir.path().join("london_daily.csv"))
            .london_hourly(dir.path().join("london_hourly.csv"))
            .all_daily(dir.path().join("all_daily.csv"))
            .all_hourly(dir.path().join("all_hourly.csv"))
            .build();

        exporter.write(&results()).unwrap();

        for name in ["london_daily.csv", "london_hourly.csv", "all_daily.csv", "all_hourly.csv"] {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
    }

    #[test]
    fn london_files_have_no_city_column() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::builder()
            .london_daily(dir.path().join("london_daily.csv"))
            .london_hourly(dir.path().join("london_hourly.csv"))
            .all_daily(dir.path().join("all_daily.csv"))
            .all_hourly(dir.path().join("all_hourly.csv"))
            .build();

        exporter.write(&results()).unwrap();

        let df = read_csv(&dir.path().join("london_daily.csv"));
        assert_eq!(df.get_column_names(), ["time", "rain_sum"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn combined_files_annotate_and_exclude_london() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::builder()
            .london_daily(dir.path().join("london_daily.csv"))
            .london_hourly(dir.path().join("london_hourly.csv"))
            .all_daily(dir.path().join("all_daily.csv"))
            .all_hourly(dir.path().join("all_hourly.csv"))
            .build();

        exporter.write(&results()).unwrap();

        let df = read_csv(&dir.path().join("all_daily.csv"));
        assert_eq!(df.get_column_names(), ["time", "rain_sum", "city"]);
        // Two cities, two days each.
        assert_eq!(df.height(), 4);

        let cities = df.column("city").unwrap().str().unwrap();
        assert!(cities.into_iter().all(|c| c != Some(LONDON_KEY)));
        assert!(cities.into_iter().any(|c| c == Some("NO,Oslo")));
        assert!(cities.into_iter().any(|c| c == Some("SE,Stockholm")));
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("london_daily.csv");
        std::fs::write(&path, "stale contents that should disappear").unwrap();

        let exporter = Exporter::builder()
            .london_daily(path.clone())
            .london_hourly(dir.path().join("london_hourly.csv"))
            .all_daily(dir.path().join("all_daily.csv"))
            .all_hourly(dir.path().join("all_hourly.csv"))
            .build();
        exporter.write(&results()).unwrap();

        let df = read_csv(&path);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn missing_london_is_a_typed_error() {
        let mut results = ResultsTable::new();
        results.insert("NO,Oslo", record(2.0));

        let exporter = Exporter::builder().build();
        let err = exporter.write(&results).unwrap_err();
        assert!(matches!(err, ExportError::MissingLondon));
    }
}
