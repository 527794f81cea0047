use crate::types::granularity::Granularity;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainDataError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode weather API response from {url}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather API returned {values} {granularity} values for {timestamps} timestamps")]
    SeriesLengthMismatch {
        granularity: Granularity,
        timestamps: usize,
        values: usize,
    },

    #[error("Failed to assemble {granularity} rainfall frame")]
    FrameBuild {
        granularity: Granularity,
        #[source]
        source: PolarsError,
    },
}
