use crate::coordinates::error::ResolveError;
use crate::export::ExportError;
use crate::rain_data::error::RainDataError;
use crate::registry::RegistryError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainfallError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    RainData(#[from] RainDataError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to read rainfall table '{0}'")]
    CsvScan(PathBuf, #[source] PolarsError),

    #[error("Failed processing rainfall frame")]
    Frame(#[from] PolarsError),
}
