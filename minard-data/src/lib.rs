//! Source table and dataset extraction for Minard's chart of the 1812
//! Russian campaign.
//!
//! The campaign data arrives as one wide table. Three independent extractors
//! borrow that table and return new record vectors:
//!
//! - [`city::extract_cities`] - city label positions
//! - [`temperature::extract_temperatures`] - temperature readings with labels
//! - [`army::extract_army`] - troop positions in draw order
//!
//! The table is validated against a [`schema::SourceSchema`] when it is
//! loaded, so a missing column surfaces before any extractor runs.

pub mod army;
pub mod city;
pub mod error;
pub mod schema;
pub mod table;
pub mod temperature;

pub use army::{extract_army, ArmyRecord, Direction};
pub use city::{extract_cities, CityRecord};
pub use error::{DataError, Result};
pub use schema::SourceSchema;
pub use table::{SourceRow, SourceTable};
pub use temperature::{extract_temperatures, TemperatureRecord};

/// Embedded CSV of the published campaign dataset.
pub static MINARD_CSV: &str = include_str!("../../fixtures/minard-data.csv");
