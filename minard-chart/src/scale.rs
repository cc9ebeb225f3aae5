use crate::error::{ChartError, Result};
use crate::model::{Scale, ScaleValues};
use serde_json::Value;

/// Smallest and largest of `values`, or `None` when there are none.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

/// Linear map from a numeric domain onto a numeric range.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale { domain, range }
    }

    /// Map `value`; a zero-width domain maps everything onto the range start.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Lookup from category labels onto range labels (e.g. colors).
#[derive(Debug, PartialEq, Clone)]
pub struct OrdinalScale {
    field: String,
    pairs: Vec<(String, String)>,
}

impl OrdinalScale {
    /// Build from a scale with label domain and range; `None` when the scale
    /// is not categorical.
    pub fn from_scale(field: &str, scale: &Scale) -> Option<OrdinalScale> {
        match (scale.domain.as_ref()?, scale.range.as_ref()?) {
            (ScaleValues::Labels(domain), ScaleValues::Labels(range)) => Some(OrdinalScale {
                field: field.to_string(),
                pairs: domain.iter().cloned().zip(range.iter().cloned()).collect(),
            }),
            _ => None,
        }
    }

    pub fn lookup(&self, value: &Value) -> Result<&str> {
        let key = category_key(value);
        self.pairs
            .iter()
            .find(|(category, _)| *category == key)
            .map(|(_, output)| output.as_str())
            .ok_or_else(|| ChartError::UnknownCategory {
                field: self.field.clone(),
                value: key,
            })
    }
}

/// Text form of a data value used to match categories and group rows.
pub fn category_key(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
