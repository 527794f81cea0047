//! Contains the `DailyRainFrame` structure for lazy operations on collected
//! daily rainfall tables, including the offline aggregation helpers.

use crate::error::RainfallError;
use crate::registry::CityRegistry;
use crate::types::granularity::AggregationPeriod;
use crate::types::season::{Season, SeasonalGrouping};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

/// A wrapper around a Polars `LazyFrame` holding daily rainfall data.
///
/// The wrapped frame uses domain column names: `date` (a `Date` column),
/// `rain` (precipitation sum in mm) and, for multi-city tables, `city`.
/// Collected CSVs carry the raw API names instead; load them through
/// [`DailyRainFrame::from_csv`] (or adapt an in-memory table with
/// [`DailyRainFrame::from_raw`]) to get the domain shape.
///
/// All aggregation methods are lazy and side-effect-free: each returns a new
/// `DailyRainFrame` (or a collected scalar) and leaves the receiver
/// untouched.
///
/// # Example
///
/// ```no_run
/// # use rainfall::{AggregationPeriod, DailyRainFrame, RainfallError};
/// # use std::path::Path;
/// # fn main() -> Result<(), RainfallError> {
/// let cities = DailyRainFrame::from_csv(Path::new("data/all_daily_rain.csv"))?;
///
/// // Mean daily rainfall across all cities, one row per date.
/// let average = cities.mean_rainfall(AggregationPeriod::Daily);
/// println!("{}", average.frame.collect()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DailyRainFrame {
    /// The underlying Polars LazyFrame containing the daily data.
    pub frame: LazyFrame,
}

impl DailyRainFrame {
    /// Wraps a frame already using the domain schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Adapts a frame carrying the raw API columns (`time`, `rain_sum`):
    /// renames them to `date`/`rain` and parses the dates.
    pub fn from_raw(frame: LazyFrame) -> Self {
        let frame = frame
            .rename(["time", "rain_sum"], ["date", "rain"], true)
            .with_column(col("date").str().to_date(StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                ..Default::default()
            }));
        Self::new(frame)
    }

    /// Lazily scans a collected daily CSV.
    ///
    /// # Errors
    ///
    /// Returns [`RainfallError::CsvScan`] if the file cannot be opened for
    /// scanning. Schema problems surface later, when the frame is collected.
    pub fn from_csv(path: &Path) -> Result<Self, RainfallError> {
        let frame = LazyCsvReader::new(path)
            .finish()
            .map_err(|e| RainfallError::CsvScan(path.to_path_buf(), e))?;
        Ok(Self::from_raw(frame))
    }

    /// Filters the daily data based on a Polars predicate expression.
    pub fn filter(&self, predicate: Expr) -> DailyRainFrame {
        DailyRainFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps records within the date range (inclusive on both ends).
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> DailyRainFrame {
        self.filter(col("date").gt_eq(lit(start)).and(col("date").lt_eq(lit(end))))
    }

    /// Keeps the record for a single date. Collecting the result yields zero
    /// or one row per city.
    pub fn get_at(&self, date: NaiveDate) -> DailyRainFrame {
        self.filter(col("date").eq(lit(date)))
    }

    /// Attaches a constant `city` column.
    ///
    /// Single-city tables (such as the London exports) are written without
    /// one; the per-city aggregations below need it.
    pub fn with_city(&self, city: &str) -> DailyRainFrame {
        DailyRainFrame::new(
            self.frame
                .clone()
                .with_column(lit(city.to_string()).alias("city")),
        )
    }

    /// Regroups daily observations into calendar-month totals per city.
    ///
    /// Dates are truncated to the first day of their month and rainfall is
    /// summed over (month, city). Applying this to already-monthly data is a
    /// no-op on the totals.
    pub fn monthly_totals(&self) -> DailyRainFrame {
        let frame = self
            .frame
            .clone()
            .group_by([
                col("date").dt().truncate(lit("1mo")).alias("date"),
                col("city"),
            ])
            .agg([col("rain").sum()])
            .sort(["date", "city"], Default::default());
        DailyRainFrame::new(frame)
    }

    /// Mean rainfall across cities for each date, rounded to 2 decimal
    /// places and labelled `Average city`.
    ///
    /// With [`AggregationPeriod::Monthly`] the observations are first
    /// regrouped into monthly totals per city.
    pub fn mean_rainfall(&self, period: AggregationPeriod) -> DailyRainFrame {
        let base = match period {
            AggregationPeriod::Monthly => self.monthly_totals(),
            AggregationPeriod::Daily => self.clone(),
        };
        let frame = base
            .frame
            .group_by([col("date")])
            .agg([col("rain").mean().round(2)])
            .with_column(lit("Average city").alias("city"))
            .sort(["date"], Default::default());
        DailyRainFrame::new(frame)
    }

    /// Mean rainfall per (date, region), rounded to 2 decimal places.
    ///
    /// Each city is mapped to its registry region; cities the registry does
    /// not know fall into a null region group.
    ///
    /// # Errors
    ///
    /// Returns [`RainfallError::Frame`] if the registry mapping frame cannot
    /// be built.
    pub fn region_mean_rainfall(
        &self,
        period: AggregationPeriod,
        registry: &CityRegistry,
    ) -> Result<DailyRainFrame, RainfallError> {
        let mapping = region_mapping(registry)?;
        let base = match period {
            AggregationPeriod::Monthly => self.monthly_totals(),
            AggregationPeriod::Daily => self.clone(),
        };
        let frame = base
            .frame
            .join(
                mapping.lazy(),
                [col("city")],
                [col("city")],
                JoinArgs::new(JoinType::Left),
            )
            .group_by([col("date"), col("region")])
            .agg([col("rain").mean().round(2)])
            .sort(["date", "region"], Default::default());
        Ok(DailyRainFrame::new(frame))
    }

    /// Total rainfall per season and year, by city or by region.
    ///
    /// Months map to seasons through the fixed table on [`Season`]; December
    /// counts towards the Winter of its own calendar year. Totals are
    /// rounded to 2 decimal places and ordered by year, then season (Winter
    /// first), then key. A `season_year` column labels each row for display.
    ///
    /// For [`SeasonalGrouping::Region`] the frame must already carry a
    /// `region` column (see [`DailyRainFrame::region_mean_rainfall`]).
    pub fn seasonal_totals(&self, grouping: SeasonalGrouping) -> DailyRainFrame {
        let key = grouping.column_name();
        let month = col("date").dt().month().cast(DataType::Int32);
        let frame = self
            .frame
            .clone()
            .with_columns([
                Season::label_expr(month.clone()).alias("season"),
                Season::order_expr(month).alias("season_rank"),
                col("date").dt().year().alias("year"),
            ])
            .group_by([col("season"), col("season_rank"), col("year"), col(key)])
            .agg([col("rain").sum().round(2)])
            .sort(["year", "season_rank", key], Default::default())
            .with_column(
                concat_str([col("season"), col("year").cast(DataType::String)], " ", true)
                    .alias("season_year"),
            )
            .select([
                col("season"),
                col("year"),
                col(key),
                col("rain"),
                col("season_year"),
            ]);
        DailyRainFrame::new(frame)
    }

    /// Collects the median of the `rain` column.
    ///
    /// Returns `None` for an empty frame.
    ///
    /// # Errors
    ///
    /// Returns [`RainfallError::Frame`] if collecting the frame fails.
    pub fn median_rainfall(&self) -> Result<Option<f64>, RainfallError> {
        let df = self
            .frame
            .clone()
            .select([col("rain").median()])
            .collect()?;
        Ok(df.column("rain")?.f64()?.get(0))
    }
}

/// Builds the city → region lookup frame from the registry.
fn region_mapping(registry: &CityRegistry) -> Result<DataFrame, PolarsError> {
    let mut cities = Vec::with_capacity(registry.city_count());
    let mut regions = Vec::with_capacity(registry.city_count());
    for (region, names) in registry.iter() {
        for city in names {
            cities.push(city.clone());
            regions.push(region.to_string());
        }
    }
    DataFrame::new(vec![
        Column::new("city".into(), cities),
        Column::new("region".into(), regions),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Builds a raw-schema daily table, as the collector would produce it.
    fn raw_frame(rows: &[(&str, f64, &str)]) -> DailyRainFrame {
        let time: Vec<&str> = rows.iter().map(|(t, _, _)| *t).collect();
        let rain: Vec<f64> = rows.iter().map(|(_, r, _)| *r).collect();
        let city: Vec<&str> = rows.iter().map(|(_, _, c)| *c).collect();
        let df = DataFrame::new(vec![
            Column::new("time".into(), time),
            Column::new("rain_sum".into(), rain),
            Column::new("city".into(), city),
        ])
        .unwrap();
        DailyRainFrame::from_raw(df.lazy())
    }

    fn registry(json: &str) -> CityRegistry {
        CityRegistry::from_json_str(json).unwrap()
    }

    #[test]
    fn from_raw_renames_and_parses_dates() {
        let df = raw_frame(&[("2023-01-15", 1.2, "NO,Oslo")])
            .frame
            .collect()
            .unwrap();

        assert_eq!(df.get_column_names(), ["date", "rain", "city"]);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        let date = df.column("date").unwrap().date().unwrap().as_date_iter().next();
        assert_eq!(date, Some(Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())));
    }

    #[test]
    fn from_csv_reads_a_collected_table() {
        // The city key itself contains a comma, so collected CSVs quote it.
        let mut quoted = tempfile::NamedTempFile::new().unwrap();
        writeln!(quoted, "time,rain_sum,city").unwrap();
        writeln!(quoted, "2023-01-01,0.4,\"NO,Oslo\"").unwrap();
        quoted.flush().unwrap();

        let df = DailyRainFrame::from_csv(quoted.path())
            .unwrap()
            .frame
            .collect()
            .unwrap();
        assert_eq!(df.get_column_names(), ["date", "rain", "city"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn get_range_is_inclusive() {
        let frame = raw_frame(&[
            ("2023-01-01", 1.0, "NO,Oslo"),
            ("2023-01-02", 2.0, "NO,Oslo"),
            ("2023-01-03", 3.0, "NO,Oslo"),
            ("2023-01-04", 4.0, "NO,Oslo"),
        ]);

        let df = frame
            .get_range(
                NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            )
            .frame
            .collect()
            .unwrap();

        assert_eq!(df.height(), 2);
        let rain: Vec<f64> = df.column("rain").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(rain, [2.0, 3.0]);
    }

    #[test]
    fn get_at_selects_a_single_date() {
        let frame = raw_frame(&[
            ("2023-01-01", 1.0, "NO,Oslo"),
            ("2023-01-02", 2.0, "NO,Oslo"),
        ]);

        let df = frame
            .get_at(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap())
            .frame
            .collect()
            .unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn with_city_labels_single_city_tables() {
        let df = DataFrame::new(vec![
            Column::new("time".into(), ["2023-01-01"]),
            Column::new("rain_sum".into(), [0.4]),
        ])
        .unwrap();

        let labelled = DailyRainFrame::from_raw(df.lazy())
            .with_city("GB,London")
            .frame
            .collect()
            .unwrap();

        let city = labelled.column("city").unwrap().str().unwrap().get(0);
        assert_eq!(city, Some("GB,London"));
    }

    #[test]
    fn monthly_totals_sum_per_city_and_month() {
        let frame = raw_frame(&[
            ("2023-01-05", 1.0, "NO,Oslo"),
            ("2023-01-20", 2.0, "NO,Oslo"),
            ("2023-02-01", 4.0, "NO,Oslo"),
            ("2023-01-10", 8.0, "SE,Stockholm"),
        ]);

        let df = frame.monthly_totals().frame.collect().unwrap();

        assert_eq!(df.height(), 3);
        let rain: Vec<f64> = df.column("rain").unwrap().f64().unwrap().into_no_null_iter().collect();
        // Sorted by (month, city): Jan/Oslo, Jan/Stockholm, Feb/Oslo.
        assert_eq!(rain, [3.0, 8.0, 4.0]);
    }

    #[test]
    fn monthly_totals_are_idempotent() {
        let frame = raw_frame(&[
            ("2023-01-05", 1.0, "NO,Oslo"),
            ("2023-01-20", 2.0, "NO,Oslo"),
            ("2023-02-14", 4.0, "NO,Oslo"),
        ]);

        let once = frame.monthly_totals();
        let twice = once.monthly_totals();

        assert!(once
            .frame
            .collect()
            .unwrap()
            .equals(&twice.frame.collect().unwrap()));
    }

    #[test]
    fn mean_rainfall_averages_across_cities_and_rounds() {
        let frame = raw_frame(&[
            ("2023-01-01", 1.0, "NO,Oslo"),
            ("2023-01-01", 2.0, "SE,Stockholm"),
            ("2023-01-01", 2.0, "FI,Helsinki"),
        ]);

        let df = frame
            .mean_rainfall(AggregationPeriod::Daily)
            .frame
            .collect()
            .unwrap();

        assert_eq!(df.height(), 1);
        let rain = df.column("rain").unwrap().f64().unwrap().get(0).unwrap();
        assert_eq!(rain, 1.67); // 5/3 rounded to 2 decimals
        let city = df.column("city").unwrap().str().unwrap().get(0);
        assert_eq!(city, Some("Average city"));
    }

    #[test]
    fn region_mean_rainfall_averages_same_region_cities() {
        let registry = registry(r#"{"North": ["GB,Manchester", "GB,Leeds"]}"#);
        let frame = raw_frame(&[
            ("2023-03-01", 1.0, "GB,Manchester"),
            ("2023-03-01", 3.0, "GB,Leeds"),
        ]);

        let df = frame
            .region_mean_rainfall(AggregationPeriod::Daily, &registry)
            .unwrap()
            .frame
            .collect()
            .unwrap();

        assert_eq!(df.height(), 1);
        let region = df.column("region").unwrap().str().unwrap().get(0);
        assert_eq!(region, Some("North"));
        let rain = df.column("rain").unwrap().f64().unwrap().get(0).unwrap();
        assert_eq!(rain, 2.0);
    }

    #[test]
    fn region_mean_rainfall_keeps_unknown_cities_in_a_null_group() {
        let registry = registry(r#"{"North": ["GB,Manchester"]}"#);
        let frame = raw_frame(&[
            ("2023-03-01", 1.0, "GB,Manchester"),
            ("2023-03-01", 9.0, "XX,Atlantis"),
        ]);

        let df = frame
            .region_mean_rainfall(AggregationPeriod::Daily, &registry)
            .unwrap()
            .frame
            .collect()
            .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("region").unwrap().null_count(), 1);
    }

    #[test]
    fn seasonal_totals_assign_winter_across_the_year_boundary() {
        let frame = raw_frame(&[
            ("2023-12-15", 1.0, "NO,Oslo"),
            ("2024-01-15", 2.0, "NO,Oslo"),
            ("2024-02-10", 4.0, "NO,Oslo"),
        ]);

        let df = frame
            .seasonal_totals(SeasonalGrouping::City)
            .frame
            .collect()
            .unwrap();

        let seasons = df.column("season").unwrap().str().unwrap();
        assert!(seasons.into_no_null_iter().all(|s| s == "Winter"));
        // December keeps its own calendar year, so two (season, year) rows.
        assert_eq!(df.height(), 2);
        let rain: Vec<f64> = df.column("rain").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(rain, [1.0, 6.0]);
    }

    #[test]
    fn seasonal_totals_order_seasons_within_a_year() {
        let frame = raw_frame(&[
            ("2023-10-01", 4.0, "NO,Oslo"), // Autumn
            ("2023-04-01", 2.0, "NO,Oslo"), // Spring
            ("2023-07-01", 3.0, "NO,Oslo"), // Summer
            ("2023-01-01", 1.0, "NO,Oslo"), // Winter
        ]);

        let df = frame
            .seasonal_totals(SeasonalGrouping::City)
            .frame
            .collect()
            .unwrap();

        let seasons: Vec<&str> = df
            .column("season")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(seasons, ["Winter", "Spring", "Summer", "Autumn"]);

        let labels: Vec<&str> = df
            .column("season_year")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels[0], "Winter 2023");
    }

    #[test]
    fn seasonal_totals_round_to_two_decimals() {
        let frame = raw_frame(&[
            ("2023-07-01", 1.111, "NO,Oslo"),
            ("2023-07-02", 2.222, "NO,Oslo"),
        ]);

        let df = frame
            .seasonal_totals(SeasonalGrouping::City)
            .frame
            .collect()
            .unwrap();

        let rain = df.column("rain").unwrap().f64().unwrap().get(0).unwrap();
        assert_eq!(rain, 3.33);
    }

    #[test]
    fn median_rainfall_collects_a_scalar() {
        let frame = raw_frame(&[
            ("2023-01-01", 1.0, "NO,Oslo"),
            ("2023-01-02", 5.0, "NO,Oslo"),
            ("2023-01-03", 9.0, "NO,Oslo"),
        ]);

        assert_eq!(frame.median_rainfall().unwrap(), Some(5.0));
    }
}
