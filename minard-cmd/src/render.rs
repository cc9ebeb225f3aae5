//! Render the campaign chart to disk.

use crate::pipeline::{build_chart, load_table, Datasets};
use anyhow::Context;
use log::info;
use minard_chart::render_svg;

/// Load the table, shape it, compose the chart and write it as SVG, and
/// optionally as Vega-Lite JSON.
pub fn run_render(
    input: &str,
    output: &str,
    vega_lite: Option<&str>,
    schema: Option<&str>,
) -> anyhow::Result<()> {
    let table = load_table(input, schema)?;
    let datasets = Datasets::extract(&table).context("Failed to shape the campaign table")?;
    let chart = build_chart(&datasets).context("Failed to compose the chart")?;

    let svg = render_svg(&chart).context("Failed to render the chart")?;
    std::fs::write(output, svg).with_context(|| format!("Failed to write {}", output))?;
    info!("Chart written to {}", output);

    if let Some(path) = vega_lite {
        let document = chart.to_vega_lite_string()?;
        std::fs::write(path, document).with_context(|| format!("Failed to write {}", path))?;
        info!("Vega-Lite specification written to {}", path);
    }
    Ok(())
}
