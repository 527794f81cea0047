//! Resolves registry cities to geographical coordinates.
//!
//! The coordinate source is a headerless CSV of
//! `country,city,latitude,longitude` rows. Cities are keyed as
//! `"country,city"` to match the registry's identifiers; rows for cities the
//! registry does not know are ignored.

use crate::coordinates::error::ResolveError;
use crate::registry::CityRegistry;
use crate::types::location::LatLon;
use log::debug;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const COORDINATE_COLUMNS: [&str; 4] = ["country", "city", "latitude", "longitude"];

/// Region-grouped city coordinates, restricted to registry cities that have
/// an entry in the coordinate CSV.
///
/// Regions appear in registry order; cities appear in the order the registry
/// lists them. A region whose cities all lack coordinates stays present with
/// an empty city list.
#[derive(Debug, Clone)]
pub struct CoordinateTable {
    regions: Vec<(String, Vec<(String, LatLon)>)>,
}

impl CoordinateTable {
    /// Builds the table from a coordinate CSV and a loaded registry.
    ///
    /// Cities present in the registry but absent from the CSV are skipped
    /// silently (logged at debug level); this is the intended policy for
    /// incomplete coordinate files. Malformed rows and unparseable
    /// coordinates for in-scope cities are fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CsvRead`] if the file cannot be parsed,
    /// [`ResolveError::ColumnCount`] if it does not have exactly four
    /// columns, [`ResolveError::MalformedRow`] if a row leaves a field
    /// empty, and [`ResolveError::InvalidCoordinate`] if a latitude or
    /// longitude of an in-scope city is not a number.
    pub fn resolve(csv_path: &Path, registry: &CityRegistry) -> Result<Self, ResolveError> {
        let city_coords = read_city_coordinates(csv_path)?;

        let mut regions = Vec::with_capacity(registry.region_count());
        for (region, cities) in registry.iter() {
            let mut resolved = Vec::new();
            for city in cities {
                match city_coords.get(city.as_str()) {
                    Some((lat, lon)) => {
                        let location = LatLon(
                            parse_coordinate(city, "latitude", lat)?,
                            parse_coordinate(city, "longitude", lon)?,
                        );
                        resolved.push((city.clone(), location));
                    }
                    None => debug!("No coordinates for '{}', skipping", city),
                }
            }
            regions.push((region.to_string(), resolved));
        }

        Ok(Self { regions })
    }

    /// Iterates regions and their resolved cities in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(String, LatLon)])> {
        self.regions
            .iter()
            .map(|(region, cities)| (region.as_str(), cities.as_slice()))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of cities that resolved to a coordinate pair.
    pub fn city_count(&self) -> usize {
        self.regions.iter().map(|(_, cities)| cities.len()).sum()
    }
}

/// Reads the CSV into a `"country,city"` -> (latitude, longitude) map.
///
/// Values stay as strings here; they are parsed to `f64` only for cities the
/// registry actually selects.
fn read_city_coordinates(path: &Path) -> Result<HashMap<String, (String, String)>, ResolveError> {
    // Headerless read with an all-string schema, so numeric-looking fields
    // survive verbatim until a registry match asks for them.
    let mut df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| ResolveError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| ResolveError::CsvRead(path.to_path_buf(), e))?;

    if df.width() != COORDINATE_COLUMNS.len() {
        return Err(ResolveError::ColumnCount {
            path: path.to_path_buf(),
            expected: COORDINATE_COLUMNS.len(),
            found: df.width(),
        });
    }
    df.set_column_names(COORDINATE_COLUMNS)?;

    let country = df.column("country")?.str()?;
    let city = df.column("city")?.str()?;
    let latitude = df.column("latitude")?.str()?;
    let longitude = df.column("longitude")?.str()?;

    let mut city_coords = HashMap::with_capacity(df.height());
    for row in 0..df.height() {
        // Short rows arrive null-padded; any hole makes the row malformed.
        let (country, city, lat, lon) = match (
            country.get(row),
            city.get(row),
            latitude.get(row),
            longitude.get(row),
        ) {
            (Some(country), Some(city), Some(lat), Some(lon)) => (country, city, lat, lon),
            _ => {
                return Err(ResolveError::MalformedRow {
                    path: path.to_path_buf(),
                    row: row + 1,
                })
            }
        };
        city_coords.insert(
            format!("{},{}", country, city),
            (lat.to_string(), lon.to_string()),
        );
    }

    Ok(city_coords)
}

fn parse_coordinate(city: &str, axis: &'static str, value: &str) -> Result<f64, ResolveError> {
    value
        .trim()
        .parse()
        .map_err(|_| ResolveError::InvalidCoordinate {
            city: city.to_string(),
            axis,
            value: value.to_string(),
        })
}
