//! Request building and response decoding for the Open-Meteo archive API.
//!
//! The API is consumed by latitude/longitude and returns JSON with parallel
//! timestamp/value vectors per requested section. It is treated as an opaque,
//! unversioned dependency: only the two precipitation series this pipeline
//! needs are modelled.

use crate::rain_data::error::RainDataError;
use crate::rain_data::fetcher::FetchPeriod;
use crate::types::granularity::Granularity;
use crate::types::location::LatLon;
use polars::prelude::*;
use serde::Deserialize;

pub(crate) const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Builds the archive request URL for one location, window and granularity.
pub(crate) fn archive_url(
    location: LatLon,
    period: FetchPeriod,
    granularity: Granularity,
) -> String {
    format!(
        "{}?latitude={}&longitude={}&start_date={}&end_date={}&{}={}",
        ARCHIVE_URL,
        location.0,
        location.1,
        period.start,
        period.end,
        granularity.api_section(),
        granularity.api_variable(),
    )
}

/// Response envelope of a `daily=rain_sum` archive request.
#[derive(Debug, Deserialize)]
pub struct DailyRainResponse {
    pub daily: DailyRainSeries,
}

/// Daily precipitation sums, one entry per calendar day.
#[derive(Debug, Deserialize)]
pub struct DailyRainSeries {
    pub time: Vec<String>,
    pub rain_sum: Vec<Option<f64>>,
}

impl DailyRainSeries {
    /// Converts the parallel vectors into a (`time`, `rain_sum`) frame.
    pub(crate) fn into_frame(self) -> Result<DataFrame, RainDataError> {
        series_frame(Granularity::Daily, self.time, self.rain_sum)
    }
}

/// Response envelope of an `hourly=rain` archive request.
#[derive(Debug, Deserialize)]
pub struct HourlyRainResponse {
    pub hourly: HourlyRainSeries,
}

/// Hourly precipitation sums, one entry per hour.
#[derive(Debug, Deserialize)]
pub struct HourlyRainSeries {
    pub time: Vec<String>,
    pub rain: Vec<Option<f64>>,
}

impl HourlyRainSeries {
    /// Converts the parallel vectors into a (`time`, `rain`) frame.
    pub(crate) fn into_frame(self) -> Result<DataFrame, RainDataError> {
        series_frame(Granularity::Hourly, self.time, self.rain)
    }
}

fn series_frame(
    granularity: Granularity,
    time: Vec<String>,
    values: Vec<Option<f64>>,
) -> Result<DataFrame, RainDataError> {
    if time.len() != values.len() {
        return Err(RainDataError::SeriesLengthMismatch {
            granularity,
            timestamps: time.len(),
            values: values.len(),
        });
    }

    let [time_name, value_name] = granularity.schema_column_names();
    DataFrame::new(vec![
        Column::new(time_name.into(), time),
        Column::new(value_name.into(), values),
    ])
    .map_err(|e| RainDataError::FrameBuild {
        granularity,
        source: e,
    })
}
