//! The collection orchestrator: one run over every resolved city.

use crate::coordinates::resolver::CoordinateTable;
use crate::error::RainfallError;
use crate::rain_data::fetcher::{FetchPeriod, RainDataFetcher, RainRecord};
use crate::types::location::LatLon;
use bon::bon;
use log::{debug, info};

/// London's coordinates, fetched on every run regardless of the registry.
pub const LONDON: LatLon = LatLon(51.50853, -0.12574);

/// The fixed results key under which London's data is stored.
pub const LONDON_KEY: &str = "GB,London";

/// City key → [`RainRecord`] mapping for one collection run, in insertion
/// order. Ephemeral: it exists only until the exporter flattens it to CSV.
///
/// Key uniqueness is assumed, not enforced; a duplicate key would simply
/// produce two entries.
#[derive(Debug, Default)]
pub struct ResultsTable {
    entries: Vec<(String, RainRecord)>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, city: impl Into<String>, record: RainRecord) {
        self.entries.push((city.into(), record));
    }

    /// First record stored under the given city key.
    pub fn get(&self, city: &str) -> Option<&RainRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key == city)
            .map(|(_, record)| record)
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RainRecord)> {
        self.entries
            .iter()
            .map(|(city, record)| (city.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drives one collection run: London first, then every region and city of
/// the coordinate table in order, fetching sequentially.
///
/// # Examples
///
/// ```no_run
/// # use rainfall::{CityRegistry, Collector, CoordinateTable, RainfallError};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), RainfallError> {
/// let registry = CityRegistry::from_path(Path::new("data/cities_config.json"))?;
/// let coordinates = CoordinateTable::resolve(Path::new("data/world_cities.csv"), &registry)?;
///
/// let collector = Collector::builder().build();
/// let results = collector.collect(&coordinates).await?;
/// println!("Collected rainfall for {} cities", results.len());
/// # Ok(())
/// # }
/// ```
pub struct Collector {
    fetcher: RainDataFetcher,
}

#[bon]
impl Collector {
    /// Creates a collector.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.period(FetchPeriod)`: Optional. The date window to request.
    ///   Defaults to [`FetchPeriod::default()`] (the 2023 calendar year).
    #[builder]
    pub fn new(period: Option<FetchPeriod>) -> Self {
        Self {
            fetcher: RainDataFetcher::new(period.unwrap_or_default()),
        }
    }

    /// Fetches rainfall for London and every resolved city, sequentially.
    ///
    /// London is always fetched first with the hardcoded [`LONDON`]
    /// coordinates and stored under [`LONDON_KEY`]. The remaining cities
    /// follow in table order: region by region, city by city. The first
    /// failed fetch aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`RainfallError::RainData`] variants for any failed request.
    pub async fn collect(
        &self,
        coordinates: &CoordinateTable,
    ) -> Result<ResultsTable, RainfallError> {
        let mut results = ResultsTable::new();

        info!(
            "Collecting rainfall for London and {} cities across {} regions",
            coordinates.city_count(),
            coordinates.region_count()
        );

        let london = self.fetcher.fetch(LONDON).await?;
        results.insert(LONDON_KEY, london);

        for (region, cities) in coordinates.iter() {
            debug!("Collecting region '{}' ({} cities)", region, cities.len());
            for (city, location) in cities {
                let record = self.fetcher.fetch(*location).await?;
                results.insert(city.clone(), record);
            }
        }

        info!("Collected {} rainfall records", results.len());
        Ok(results)
    }
}
