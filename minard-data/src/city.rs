use crate::error::Result;
use crate::table::SourceTable;
use log::debug;
use serde::{Deserialize, Serialize};

/// A city label position on the map.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CityRecord {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub city: String,
}

/// Select the rows naming a city, in source order.
///
/// Blank rows and rows without a city name are skipped. A named city with an
/// empty coordinate is kept as it is; it has no position on the map.
pub fn extract_cities(table: &SourceTable) -> Result<Vec<CityRecord>> {
    let cities: Vec<CityRecord> = table
        .rows()
        .iter()
        .filter(|row| !row.is_blank())
        .filter_map(|row| {
            row.city.as_ref().map(|city| CityRecord {
                lon: row.city_lon,
                lat: row.city_lat,
                city: city.clone(),
            })
        })
        .collect();
    debug!("extracted {} cities", cities.len());
    Ok(cities)
}
