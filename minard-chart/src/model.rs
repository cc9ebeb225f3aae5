//! Declarative chart description.
//!
//! A chart is a vertical stack of panels, each panel an ordered list of
//! independent layers (mark + inline data + encoding channels). Layers are
//! combined with [`layer`] and panels with [`vconcat`]; the first layer in a
//! panel is drawn first. The types serialise to Vega-Lite v5 JSON.

use crate::error::Result;
use serde::{Serialize, Serializer};
use serde_json::Value;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    /// A path whose width varies along its length
    Trail,
    Text,
    Line,
}

/// Non-default font style; an unset style renders upright.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Italic,
}

/// Mark-level style constants. Unset properties fall back to defaults.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Text rotation in degrees, clockwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Horizontal pixel offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    /// Vertical pixel offset, downwards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(flatten)]
    pub style: MarkStyle,
}

impl Mark {
    pub fn new(kind: MarkType) -> Mark {
        Mark {
            kind,
            style: MarkStyle::default(),
        }
    }

    pub fn styled(kind: MarkType, style: MarkStyle) -> Mark {
        Mark { kind, style }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Nominal,
}

/// Domain or range values of a scale.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(untagged)]
pub enum ScaleValues {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Scale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<ScaleValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ScaleValues>,
}

impl Scale {
    pub fn with_domain(min: f64, max: f64) -> Scale {
        Scale {
            domain: Some(ScaleValues::Numbers(vec![min, max])),
            range: None,
        }
    }

    pub fn with_range(min: f64, max: f64) -> Scale {
        Scale {
            domain: None,
            range: Some(ScaleValues::Numbers(vec![min, max])),
        }
    }

    pub fn categorical(domain: &[&str], range: &[&str]) -> Scale {
        let labels = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Scale {
            domain: Some(ScaleValues::Labels(labels(domain))),
            range: Some(ScaleValues::Labels(labels(range))),
        }
    }

    /// The `[min, max]` of a numeric domain.
    pub fn numeric_domain(&self) -> Option<(f64, f64)> {
        numeric_pair(self.domain.as_ref())
    }

    /// The `[min, max]` of a numeric range.
    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        numeric_pair(self.range.as_ref())
    }
}

fn numeric_pair(values: Option<&ScaleValues>) -> Option<(f64, f64)> {
    match values? {
        ScaleValues::Numbers(numbers) if numbers.len() >= 2 => {
            Some((numbers[0], numbers[numbers.len() - 1]))
        }
        _ => None,
    }
}

/// Axis placement other than the default (left for y, bottom for x).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    Right,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orient: Option<AxisOrient>,
}

/// One encoding channel: which data field drives it and how.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    /// Serialised as `"legend": null`
    #[serde(
        rename = "legend",
        skip_serializing_if = "std::ops::Not::not",
        serialize_with = "serialize_hidden_legend"
    )]
    pub hide_legend: bool,
}

fn serialize_hidden_legend<S: Serializer>(_: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_none()
}

impl FieldDef {
    pub fn quantitative(field: &str) -> FieldDef {
        FieldDef::new(field, FieldType::Quantitative)
    }

    pub fn nominal(field: &str) -> FieldDef {
        FieldDef::new(field, FieldType::Nominal)
    }

    fn new(field: &str, field_type: FieldType) -> FieldDef {
        FieldDef {
            field: field.to_string(),
            field_type,
            scale: None,
            axis: None,
            hide_legend: false,
        }
    }

    pub fn scale(mut self, scale: Scale) -> FieldDef {
        self.scale = Some(scale);
        self
    }

    pub fn axis(mut self, axis: Axis) -> FieldDef {
        self.axis = Some(axis);
        self
    }

    pub fn no_legend(mut self) -> FieldDef {
        self.hide_legend = true;
        self
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldDef>,
    /// Grouping key splitting the data into separately drawn paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<FieldDef>,
}

impl Encoding {
    /// Field positioning data horizontally: `x`, else `longitude`.
    pub fn horizontal(&self) -> Option<&FieldDef> {
        self.x.as_ref().or(self.longitude.as_ref())
    }

    /// Field positioning data vertically: `y`, else `latitude`.
    pub fn vertical(&self) -> Option<&FieldDef> {
        self.y.as_ref().or(self.latitude.as_ref())
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct InlineData {
    pub values: Vec<Value>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Layer {
    pub mark: Mark,
    pub data: InlineData,
    pub encoding: Encoding,
}

impl Layer {
    /// A layer whose data rows are the serialised `records`.
    pub fn new<T: Serialize>(mark: Mark, records: &[T], encoding: Encoding) -> Result<Layer> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        Ok(Layer {
            mark,
            data: InlineData { values },
            encoding,
        })
    }
}

/// One rectangular sub-chart: layers drawn bottom to top.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Panel {
    pub layer: Vec<Layer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Panel {
    pub fn with_height(mut self, height: u32) -> Panel {
        self.height = Some(height);
        self
    }
}

/// Overlay layers into one panel, first layer at the bottom.
pub fn layer<I: IntoIterator<Item = Layer>>(layers: I) -> Panel {
    Panel {
        layer: layers.into_iter().collect(),
        height: None,
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
    pub stroke_width: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    pub grid: bool,
    pub label_font: String,
    pub title_font: String,
}

/// Figure-level styling shared by every panel.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ChartConfig {
    pub view: ViewConfig,
    pub axis: AxisConfig,
}

/// Panels stacked top to bottom.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct CompositeChart {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub vconcat: Vec<Panel>,
    pub config: ChartConfig,
}

/// Stack panels vertically, first panel on top.
pub fn vconcat<I: IntoIterator<Item = Panel>>(panels: I, config: ChartConfig) -> CompositeChart {
    CompositeChart {
        schema: VEGA_LITE_SCHEMA,
        vconcat: panels.into_iter().collect(),
        config,
    }
}

impl CompositeChart {
    pub fn panels(&self) -> &[Panel] {
        &self.vconcat
    }

    /// The chart as a Vega-Lite document.
    pub fn to_vega_lite(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_vega_lite_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
