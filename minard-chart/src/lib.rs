//! Chart assembly for Minard's figure of the 1812 Russian campaign.
//!
//! [`compose::compose_chart`] turns the three shaped datasets into a
//! [`model::CompositeChart`]: a map panel (troop trail, city and survivor
//! labels) stacked above a temperature panel on the same longitude axis.
//! The chart can be exported as Vega-Lite JSON or rendered to SVG with
//! [`render::render_svg`].

pub mod compose;
pub mod error;
pub mod model;
pub mod render;
pub mod scale;
pub mod style;

pub use compose::compose_chart;
pub use error::{ChartError, Result};
pub use model::{layer, vconcat, CompositeChart, Layer, Panel};
pub use render::render_svg;
