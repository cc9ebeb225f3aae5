//! The fixed column contract of the campaign table.
//!
//! The source CSV is "wide": city labels, temperature readings and troop
//! positions share rows but are otherwise unrelated, so each group of columns
//! is padded with empty cells where the group runs out of data.

use crate::error::{DataError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Header names of every column the pipeline reads.
///
/// `Default` yields the names of the published dataset. Any subset of fields
/// may be overridden from JSON; missing fields keep their defaults.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSchema {
    /// Longitude of a city label (LONC)
    pub city_lon: String,
    /// Latitude of a city label (LATC)
    pub city_lat: String,
    /// City name (CITY)
    pub city: String,
    /// Longitude of a temperature reading (LONT)
    pub temp_lon: String,
    /// Temperature in degrees Celsius (TEMP)
    pub temp: String,
    /// Days between readings (DAYS)
    pub days: String,
    /// Calendar month of the reading (MON)
    pub month: String,
    /// Day of the month of the reading (DAY)
    pub day: String,
    /// Longitude of a troop position (LONP)
    pub army_lon: String,
    /// Latitude of a troop position (LATP)
    pub army_lat: String,
    /// Number of survivors (SURV)
    pub survivors: String,
    /// March direction, `A` or `R` (DIR)
    pub direction: String,
    /// Division identifier (DIV)
    pub division: String,
}

impl Default for SourceSchema {
    fn default() -> Self {
        SourceSchema {
            city_lon: "LONC".to_string(),
            city_lat: "LATC".to_string(),
            city: "CITY".to_string(),
            temp_lon: "LONT".to_string(),
            temp: "TEMP".to_string(),
            days: "DAYS".to_string(),
            month: "MON".to_string(),
            day: "DAY".to_string(),
            army_lon: "LONP".to_string(),
            army_lat: "LATP".to_string(),
            survivors: "SURV".to_string(),
            direction: "DIR".to_string(),
            division: "DIV".to_string(),
        }
    }
}

/// Positions of the schema's columns within one header row.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ColumnIndex {
    pub city_lon: usize,
    pub city_lat: usize,
    pub city: usize,
    pub temp_lon: usize,
    pub temp: usize,
    pub days: usize,
    pub month: usize,
    pub day: usize,
    pub army_lon: usize,
    pub army_lat: usize,
    pub survivors: usize,
    pub direction: usize,
    pub division: usize,
}

impl SourceSchema {
    /// Parse schema overrides from a JSON object.
    pub fn from_json(json: &str) -> Result<SourceSchema> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate a header row against the schema and locate every column.
    ///
    /// Fails on the first column that is absent, before any data row is
    /// looked at.
    pub fn resolve(&self, headers: &StringRecord) -> Result<ColumnIndex> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| DataError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(ColumnIndex {
            city_lon: find(&self.city_lon)?,
            city_lat: find(&self.city_lat)?,
            city: find(&self.city)?,
            temp_lon: find(&self.temp_lon)?,
            temp: find(&self.temp)?,
            days: find(&self.days)?,
            month: find(&self.month)?,
            day: find(&self.day)?,
            army_lon: find(&self.army_lon)?,
            army_lat: find(&self.army_lat)?,
            survivors: find(&self.survivors)?,
            direction: find(&self.direction)?,
            division: find(&self.division)?,
        })
    }
}
