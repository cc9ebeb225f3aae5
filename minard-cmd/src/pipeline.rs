//! Table loading and the extract-then-compose pipeline.

use anyhow::Context;
use log::{debug, info};
use minard_chart::{compose_chart, CompositeChart};
use minard_data::{
    extract_army, extract_cities, extract_temperatures, ArmyRecord, CityRecord, SourceSchema,
    SourceTable, TemperatureRecord,
};

/// The three shaped datasets the chart is built from.
#[derive(Debug, PartialEq, Clone)]
pub struct Datasets {
    pub cities: Vec<CityRecord>,
    pub temperatures: Vec<TemperatureRecord>,
    pub army: Vec<ArmyRecord>,
}

impl Datasets {
    /// Run the three extractors over one table.
    pub fn extract(table: &SourceTable) -> minard_data::Result<Datasets> {
        let cities = extract_cities(table)?;
        let temperatures = extract_temperatures(table)?;
        let army = extract_army(table)?;
        info!(
            "Extracted {} cities, {} temperature readings, {} troop positions from {} rows",
            cities.len(),
            temperatures.len(),
            army.len(),
            table.len()
        );
        Ok(Datasets {
            cities,
            temperatures,
            army,
        })
    }
}

pub fn build_chart(datasets: &Datasets) -> minard_chart::Result<CompositeChart> {
    compose_chart(&datasets.temperatures, &datasets.army, &datasets.cities)
}

/// Load the campaign CSV, with column names from the optional schema file.
pub fn load_table(input: &str, schema_path: Option<&str>) -> anyhow::Result<SourceTable> {
    let schema = match schema_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema file {}", path))?;
            SourceSchema::from_json(&json)
                .with_context(|| format!("Failed to parse schema file {}", path))?
        }
        None => SourceSchema::default(),
    };
    debug!("Source columns: {:?}", schema);
    let table = SourceTable::from_path(input, &schema)
        .with_context(|| format!("Failed to load campaign table {}", input))?;
    info!("Loaded {} rows from {}", table.len(), input);
    Ok(table)
}
