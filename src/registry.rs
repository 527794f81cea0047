//! The city registry: which cities are in scope, grouped by region.
//!
//! Loaded once from a JSON object mapping region names to lists of
//! `"country,city"` identifiers. Document order is preserved and drives the
//! iteration order of every later stage.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read city registry '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse city registry JSON")]
    Parse(#[from] serde_json::Error),

    #[error("Expected region '{0}' to map to an array of city names")]
    InvalidRegion(String),
}

/// Mapping from region name to the cities belonging to it.
///
/// Immutable after load. Regions and cities iterate in the order of the JSON
/// document they were loaded from.
///
/// # Examples
///
/// ```
/// use rainfall::CityRegistry;
///
/// let registry = CityRegistry::from_json_str(
///     r#"{"GB": ["GB,Manchester", "GB,Leeds"]}"#,
/// ).unwrap();
/// assert_eq!(registry.region_count(), 1);
/// assert_eq!(registry.region_of("GB,Leeds"), Some("GB"));
/// ```
#[derive(Debug, Clone)]
pub struct CityRegistry {
    regions: Vec<(String, Vec<String>)>,
}

impl CityRegistry {
    /// Loads the registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Read`] if the file cannot be read, and the
    /// parse errors described on [`CityRegistry::from_json_str`] otherwise.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Read(path.to_path_buf(), e))?;
        Self::from_json_str(&text)
    }

    /// Parses the registry from JSON text.
    ///
    /// The document must be an object whose values are arrays of strings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Parse`] if the text is not a JSON object, or
    /// [`RegistryError::InvalidRegion`] if a region maps to anything other
    /// than an array of strings.
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        let document: Map<String, Value> = serde_json::from_str(text)?;

        let mut regions = Vec::with_capacity(document.len());
        for (region, entry) in document {
            let cities = entry
                .as_array()
                .ok_or_else(|| RegistryError::InvalidRegion(region.clone()))?
                .iter()
                .map(|city| {
                    city.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| RegistryError::InvalidRegion(region.clone()))
                })
                .collect::<Result<Vec<String>, RegistryError>>()?;
            regions.push((region, cities));
        }

        Ok(Self { regions })
    }

    /// Iterates regions and their cities in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.regions
            .iter()
            .map(|(region, cities)| (region.as_str(), cities.as_slice()))
    }

    /// Looks up the region a city belongs to.
    ///
    /// Returns `None` for cities not present in the registry.
    pub fn region_of(&self, city: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|(_, cities)| cities.iter().any(|c| c == city))
            .map(|(region, _)| region.as_str())
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn city_count(&self) -> usize {
        self.regions.iter().map(|(_, cities)| cities.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
