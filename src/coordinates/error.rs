use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to read coordinate table '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Coordinate table '{path}' has {found} columns, expected {expected}")]
    ColumnCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Coordinate table '{path}' row {row} is missing fields")]
    MalformedRow { path: PathBuf, row: usize },

    #[error("Invalid {axis} '{value}' for city '{city}'")]
    InvalidCoordinate {
        city: String,
        axis: &'static str,
        value: String,
    },

    #[error("Failed processing coordinate table")]
    Frame(#[from] PolarsError),
}
