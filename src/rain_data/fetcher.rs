//! Fetches daily and hourly precipitation series for one location.

use crate::rain_data::api::{archive_url, DailyRainResponse, HourlyRainResponse};
use crate::rain_data::error::RainDataError;
use crate::types::granularity::Granularity;
use crate::types::location::LatLon;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::DataFrame;
use reqwest::Client;

/// Default collection window: the 2023 calendar year.
pub const DEFAULT_START_DATE: &str = "2023-01-01";
pub const DEFAULT_END_DATE: &str = "2023-12-31";

/// Inclusive date window requested from the archive API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl Default for FetchPeriod {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_DATE
                .parse()
                .expect("default start date is a valid calendar date"),
            end: DEFAULT_END_DATE
                .parse()
                .expect("default end date is a valid calendar date"),
        }
    }
}

/// A single city's collected rainfall: a daily frame (`time`, `rain_sum`)
/// and an hourly frame (`time`, `rain`). Produced once per city per run and
/// not mutated afterwards.
#[derive(Debug, Clone)]
pub struct RainRecord {
    pub daily: DataFrame,
    pub hourly: DataFrame,
}

/// Retrieves historical precipitation series from the Open-Meteo archive API.
///
/// One fetch issues two sequential requests — daily then hourly — for the
/// configured window. Failures propagate to the caller and abort the run;
/// there is no retry, timeout policy, or rate limiting.
pub struct RainDataFetcher {
    client: Client,
    period: FetchPeriod,
}

impl RainDataFetcher {
    pub fn new(period: FetchPeriod) -> Self {
        Self {
            client: Client::new(),
            period,
        }
    }

    /// The window this fetcher requests.
    pub fn period(&self) -> FetchPeriod {
        self.period
    }

    /// Fetches both precipitation series for a location.
    ///
    /// # Errors
    ///
    /// Returns [`RainDataError::NetworkRequest`] for transport failures,
    /// [`RainDataError::HttpStatus`] for non-success responses,
    /// [`RainDataError::ResponseDecode`] if the body is not the expected
    /// JSON shape, and [`RainDataError::SeriesLengthMismatch`] /
    /// [`RainDataError::FrameBuild`] if the decoded series cannot be turned
    /// into a frame.
    pub async fn fetch(&self, location: LatLon) -> Result<RainRecord, RainDataError> {
        let daily = self.fetch_daily(location).await?;
        let hourly = self.fetch_hourly(location).await?;
        Ok(RainRecord { daily, hourly })
    }

    async fn fetch_daily(&self, location: LatLon) -> Result<DataFrame, RainDataError> {
        let url = archive_url(location, self.period, Granularity::Daily);
        let response: DailyRainResponse = self.get_json(&url).await?;
        response.daily.into_frame()
    }

    async fn fetch_hourly(&self, location: LatLon) -> Result<DataFrame, RainDataError> {
        let url = archive_url(location, self.period, Granularity::Hourly);
        let response: HourlyRainResponse = self.get_json(&url).await?;
        response.hourly.into_frame()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, RainDataError> {
        info!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RainDataError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    RainDataError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    RainDataError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        response
            .json::<T>()
            .await
            .map_err(|e| RainDataError::ResponseDecode {
                url: url.to_string(),
                source: e,
            })
    }
}
