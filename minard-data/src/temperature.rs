//! Temperature readings along the line of retreat.
//!
//! Each reading becomes a point on the lower panel, labelled with the
//! temperature and, when known, the day and month it was taken.

use crate::error::Result;
use crate::table::SourceTable;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A temperature reading with its display label.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TemperatureRecord {
    /// Empty when the reading's longitude is unknown
    pub lon: Option<f64>,
    pub temp: f64,
    pub days: Option<f64>,
    /// Label of the form `"<temp>°C  <day>,<month>"`
    pub date: String,
}

/// Day and month of a reading, as text.
///
/// A key only exists when at least one component is known; "neither
/// component" is represented by the absence of a key, never by a token that
/// could leak into a label.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DateKey {
    day: Option<String>,
    month: Option<String>,
}

impl DateKey {
    pub fn new(day: Option<String>, month: Option<String>) -> Option<DateKey> {
        if day.is_none() && month.is_none() {
            None
        } else {
            Some(DateKey { day, month })
        }
    }

    /// `"<day>,<month>"` with an empty side for a missing component.
    pub fn label_fragment(&self) -> String {
        format!(
            "{},{}",
            self.day.as_deref().unwrap_or(""),
            self.month.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.day.as_deref().unwrap_or(""),
            self.month.as_deref().unwrap_or("")
        )
    }
}

/// Integer text of a numeric day: `10.0` is `"10"`, `0.0` is `"0"`.
pub fn normalize_day(day: f64) -> String {
    (day.trunc() as i64).to_string()
}

/// Month as text. Numeric months (`"11"`, `"11.0"`) become integer text,
/// month names are kept as written.
pub fn normalize_month(month: &str) -> String {
    let month = month.trim();
    match month.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => normalize_day(value),
        _ => month.to_string(),
    }
}

/// Shortest text for a reading: `-20.0` is `"-20"`, `-20.5` stays `"-20.5"`.
pub fn format_number(value: f64) -> String {
    // `-0.0` would otherwise print as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}

/// Build the label shown next to a reading.
pub fn format_date_label(temp: f64, key: Option<&DateKey>) -> String {
    format!(
        "{}°C  {}",
        format_number(temp),
        key.map(DateKey::label_fragment).unwrap_or_default()
    )
}

/// Select the rows carrying a temperature, in source order, and derive
/// their labels. Other empty cells are carried through.
pub fn extract_temperatures(table: &SourceTable) -> Result<Vec<TemperatureRecord>> {
    let temperatures: Vec<TemperatureRecord> = table
        .rows()
        .iter()
        .filter_map(|row| row.temp.map(|temp| (row, temp)))
        .map(|(row, temp)| {
            let key = DateKey::new(
                row.day.map(normalize_day),
                row.month.as_deref().map(normalize_month),
            );
            if let Some(key) = &key {
                trace!("row {}: date key {}", row.line, key);
            }
            TemperatureRecord {
                lon: row.temp_lon,
                temp,
                days: row.days,
                date: format_date_label(temp, key.as_ref()),
            }
        })
        .collect();
    debug!("extracted {} temperature readings", temperatures.len());
    Ok(temperatures)
}
