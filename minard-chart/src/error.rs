//! Error types for chart composition and rendering
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Main error type for building and drawing the composite chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// A dataset needed to derive an axis domain has no records
    #[error("Cannot derive axis domains: dataset `{dataset}` is empty")]
    EmptyDataset { dataset: &'static str },

    /// A panel declares no explicit domain for one of its axes
    #[error("Panel {panel} has no explicit {axis} domain")]
    MissingDomain { panel: usize, axis: &'static str },

    /// A domain is inverted or not finite
    #[error("Invalid {axis} domain [{min}, {max}]")]
    InvalidDomain {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    /// A datum lacks a field its encoding refers to
    #[error("Datum has no usable value for field `{field}`")]
    MissingField { field: String },

    /// A categorical value is absent from its color scale domain
    #[error("Value {value:?} of field `{field}` is not in the color scale domain")]
    UnknownCategory { field: String, value: String },

    /// Color text is not `#RRGGBB`
    #[error("Invalid color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    /// Failed to turn records into inline chart data
    #[error("Failed to serialize chart data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The drawing backend reported a failure
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

/// Type alias for Results using ChartError
pub type Result<T> = std::result::Result<T, ChartError>;
