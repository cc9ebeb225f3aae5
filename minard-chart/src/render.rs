//! Static SVG rendering of a [`CompositeChart`] with plotters.
//!
//! Panels are drawn top to bottom, layers within a panel in order. Each
//! panel's x and y scales come from the first layer declaring an explicit
//! domain for that axis; `longitude`/`latitude` channels are placed on the
//! same linear scales as `x`/`y`. Marks are drawn in pixel space on the root
//! area so trail widths and text offsets are exact pixel amounts.

use crate::error::{ChartError, Result};
use crate::model::{
    AxisOrient, ChartConfig, CompositeChart, Encoding, FieldDef, FontStyle, Layer, MarkType,
    Panel,
};
use crate::scale::{category_key, extent, LinearScale, OrdinalScale};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle as TextFontStyle, FontTransform};
use serde_json::Value;

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
const PANEL_SPACING: u32 = 20;
const AXIS_LABEL_SIZE: f64 = 11.0;
const AXIS_TITLE_SIZE: f64 = 13.0;
const DEFAULT_FONT: &str = "sans-serif";
const DEFAULT_FONT_SIZE: f64 = 11.0;
/// Stroke width of lines, and of trails without a size channel
const DEFAULT_STROKE: f64 = 2.0;

type Root<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Pixel = (i32, i32);

#[derive(Debug, Clone, Copy)]
enum AxisKind {
    X,
    Y,
}

impl AxisKind {
    fn name(self) -> &'static str {
        match self {
            AxisKind::X => "x",
            AxisKind::Y => "y",
        }
    }

    fn channel(self, encoding: &Encoding) -> Option<&FieldDef> {
        match self {
            AxisKind::X => encoding.x.as_ref(),
            AxisKind::Y => encoding.y.as_ref(),
        }
    }
}

/// Outer pixel size of the rendered figure.
pub fn canvas_size(chart: &CompositeChart) -> (u32, u32) {
    let width = chart.config.view.width + 2 * MARGIN + Y_LABEL_AREA;
    let panels = chart.panels();
    let height = panels
        .iter()
        .map(|panel| panel_height(panel, &chart.config))
        .sum::<u32>()
        + PANEL_SPACING * panels.len().saturating_sub(1) as u32;
    (width, height)
}

fn panel_height(panel: &Panel, config: &ChartConfig) -> u32 {
    panel.height.unwrap_or(config.view.height) + 2 * MARGIN + X_LABEL_AREA
}

/// Render the chart to an SVG document.
pub fn render_svg(chart: &CompositeChart) -> Result<String> {
    let (width, height) = canvas_size(chart);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut top = 0u32;
        for (index, panel) in chart.panels().iter().enumerate() {
            let height = panel_height(panel, &chart.config);
            let area = root.clone().shrink((0u32, top), (width, height));
            draw_panel(&root, &area, panel, &chart.config, index)?;
            top += height + PANEL_SPACING;
        }
        root.present()?;
    }
    debug!("rendered {}x{} SVG, {} bytes", width, height, svg.len());
    Ok(svg)
}

fn explicit_axis(panel: &Panel, index: usize, kind: AxisKind) -> Result<(&FieldDef, (f64, f64))> {
    let (field, (min, max)) = panel
        .layer
        .iter()
        .filter_map(|layer| kind.channel(&layer.encoding))
        .find_map(|field| {
            let domain = field.scale.as_ref()?.numeric_domain()?;
            Some((field, domain))
        })
        .ok_or(ChartError::MissingDomain {
            panel: index,
            axis: kind.name(),
        })?;
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(ChartError::InvalidDomain {
            axis: kind.name(),
            min,
            max,
        });
    }
    Ok((field, (min, max)))
}

fn axis_grid(field: &FieldDef, config: &ChartConfig) -> bool {
    field
        .axis
        .as_ref()
        .and_then(|axis| axis.grid)
        .unwrap_or(config.axis.grid)
}

fn axis_title(field: &FieldDef) -> Option<&str> {
    field.axis.as_ref()?.title.as_deref()
}

fn draw_panel(
    root: &Root,
    area: &Root,
    panel: &Panel,
    config: &ChartConfig,
    index: usize,
) -> Result<()> {
    let (x_field, x_domain) = explicit_axis(panel, index, AxisKind::X)?;
    let (y_field, y_domain) = explicit_axis(panel, index, AxisKind::Y)?;
    let y_on_right = y_field.axis.as_ref().and_then(|axis| axis.orient) == Some(AxisOrient::Right);

    let mut builder = ChartBuilder::on(area);
    builder.margin(MARGIN).x_label_area_size(X_LABEL_AREA);
    if y_on_right {
        builder.right_y_label_area_size(Y_LABEL_AREA);
    } else {
        builder.y_label_area_size(Y_LABEL_AREA);
    }
    let mut chart =
        builder.build_cartesian_2d(x_domain.0..x_domain.1, y_domain.0..y_domain.1)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.label_style(FontDesc::new(
            FontFamily::Name(&config.axis.label_font),
            AXIS_LABEL_SIZE,
            TextFontStyle::Normal,
        ))
        .axis_desc_style(FontDesc::new(
            FontFamily::Name(&config.axis.title_font),
            AXIS_TITLE_SIZE,
            TextFontStyle::Normal,
        ));
        if let Some(title) = axis_title(x_field) {
            mesh.x_desc(title);
        }
        if let Some(title) = axis_title(y_field) {
            mesh.y_desc(title);
        }
        if !axis_grid(x_field, config) {
            mesh.disable_x_mesh();
        }
        if !axis_grid(y_field, config) {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;
    }

    let to_pixel = |x: f64, y: f64| chart.backend_coord(&(x, y));
    for layer in &panel.layer {
        let positions = project(layer, &to_pixel)?;
        match layer.mark.kind {
            MarkType::Trail => draw_trail(root, layer, &positions)?,
            MarkType::Line => draw_line(root, layer, &positions)?,
            MarkType::Text => draw_text(root, layer, &positions)?,
        }
    }
    Ok(())
}

/// Numeric value of `field`; `None` for an empty (null) cell.
fn number(datum: &Value, field: &str) -> Result<Option<f64>> {
    match datum.get(field) {
        Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| ChartError::MissingField {
            field: field.to_string(),
        }),
        None => Err(ChartError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pixel position of every datum, `None` where a coordinate is empty.
/// Empty when the layer has no position channels.
fn project(layer: &Layer, to_pixel: &dyn Fn(f64, f64) -> Pixel) -> Result<Vec<Option<Pixel>>> {
    let (Some(x), Some(y)) = (layer.encoding.horizontal(), layer.encoding.vertical()) else {
        return Ok(Vec::new());
    };
    layer
        .data
        .values
        .iter()
        .map(|datum| {
            let at = number(datum, &x.field)?.zip(number(datum, &y.field)?);
            Ok(at.map(|(x, y)| to_pixel(x, y)))
        })
        .collect()
}

/// Parse `#RRGGBB`.
pub fn parse_color(text: &str) -> Result<RGBColor> {
    let invalid = || ChartError::InvalidColor(text.to_string());
    let hex = text
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .ok_or_else(invalid)?;
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn mark_color(layer: &Layer) -> Result<RGBColor> {
    layer
        .mark
        .style
        .color
        .as_deref()
        .map(parse_color)
        .unwrap_or(Ok(BLACK))
}

/// Per-datum colors from the color channel, else the mark color. A datum
/// whose category cell is empty has no color.
fn datum_colors(layer: &Layer) -> Result<Vec<Option<RGBColor>>> {
    let fallback = mark_color(layer)?;
    let Some(field) = layer.encoding.color.as_ref() else {
        return Ok(vec![Some(fallback); layer.data.values.len()]);
    };
    let Some(scale) = field
        .scale
        .as_ref()
        .and_then(|scale| OrdinalScale::from_scale(&field.field, scale))
    else {
        return Ok(vec![Some(fallback); layer.data.values.len()]);
    };
    layer
        .data
        .values
        .iter()
        .map(|datum| match datum.get(&field.field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse_color(scale.lookup(value)?).map(Some),
        })
        .collect()
}

/// Per-datum stroke widths from the size channel, scaled linearly from
/// `[0, max]` onto the channel's range; `None` for an empty size cell.
fn datum_widths(layer: &Layer) -> Result<Vec<Option<f64>>> {
    let Some(field) = layer.encoding.size.as_ref() else {
        return Ok(vec![Some(DEFAULT_STROKE); layer.data.values.len()]);
    };
    let values = layer
        .data
        .values
        .iter()
        .map(|datum| number(datum, &field.field))
        .collect::<Result<Vec<Option<f64>>>>()?;
    let range = field
        .scale
        .as_ref()
        .and_then(|scale| scale.numeric_range())
        .unwrap_or((DEFAULT_STROKE, DEFAULT_STROKE));
    let max = extent(values.iter().flatten().copied()).map_or(0.0, |(_, max)| max);
    let scale = LinearScale::new((0.0, max), range);
    Ok(values
        .into_iter()
        .map(|value| value.map(|value| scale.map(value)))
        .collect())
}

/// Datum indices per `detail` group, groups in order of first appearance.
fn detail_groups(layer: &Layer) -> Vec<Vec<usize>> {
    let Some(field) = layer.encoding.detail.as_ref() else {
        return vec![(0..layer.data.values.len()).collect()];
    };
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (index, datum) in layer.data.values.iter().enumerate() {
        let key = category_key(datum.get(&field.field).unwrap_or(&Value::Null));
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(index),
            None => groups.push((key, vec![index])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

/// Quadrilateral covering a trail segment whose width goes from `w0` to `w1`.
fn segment_outline(p0: Pixel, p1: Pixel, w0: f64, w1: f64) -> Option<Vec<Pixel>> {
    let (dx, dy) = (f64::from(p1.0 - p0.0), f64::from(p1.1 - p0.1));
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let (nx, ny) = (-dy / length, dx / length);
    let offset = |p: Pixel, width: f64, side: f64| {
        (
            (f64::from(p.0) + side * nx * width / 2.0).round() as i32,
            (f64::from(p.1) + side * ny * width / 2.0).round() as i32,
        )
    };
    Some(vec![
        offset(p0, w0, 1.0),
        offset(p1, w1, 1.0),
        offset(p1, w1, -1.0),
        offset(p0, w0, -1.0),
    ])
}

fn joint(root: &Root, at: Pixel, width: f64, color: RGBColor) -> Result<()> {
    let radius = (width / 2.0).round().max(1.0) as u32;
    root.draw(&Circle::new(at, radius, color.filled()))?;
    Ok(())
}

/// A trail vertex: position, width and color of one datum.
type Vertex = (Pixel, f64, RGBColor);

/// The vertices of each `detail` group, leaving out data that lack a
/// position, a width or a color.
fn trail_vertices(layer: &Layer, positions: &[Option<Pixel>]) -> Result<Vec<Vec<Vertex>>> {
    let colors = datum_colors(layer)?;
    let widths = datum_widths(layer)?;
    let vertex = |index: usize| -> Option<Vertex> {
        Some((positions[index]?, widths[index]?, colors[index]?))
    };
    Ok(detail_groups(layer)
        .into_iter()
        .map(|group| group.into_iter().filter_map(&vertex).collect::<Vec<Vertex>>())
        .filter(|vertices| !vertices.is_empty())
        .collect())
}

fn draw_trail(root: &Root, layer: &Layer, positions: &[Option<Pixel>]) -> Result<()> {
    if positions.is_empty() {
        return Ok(());
    }
    for vertices in trail_vertices(layer, positions)? {
        if let [(at, width, color)] = vertices.as_slice() {
            joint(root, *at, *width, *color)?;
            continue;
        }
        for pair in vertices.windows(2) {
            let ((p0, w0, color), (p1, w1, _)) = (pair[0], pair[1]);
            if let Some(outline) = segment_outline(p0, p1, w0, w1) {
                root.draw(&Polygon::new(outline, color.filled()))?;
            }
            joint(root, p0, w0, color)?;
            joint(root, p1, w1, color)?;
        }
    }
    Ok(())
}

fn draw_line(root: &Root, layer: &Layer, positions: &[Option<Pixel>]) -> Result<()> {
    let mut points: Vec<Pixel> = positions.iter().flatten().copied().collect();
    if points.len() < 2 {
        return Ok(());
    }
    points.sort_by_key(|point| point.0);
    let color = mark_color(layer)?;
    root.draw(&PathElement::new(
        points,
        color.stroke_width(DEFAULT_STROKE as u32),
    ))?;
    Ok(())
}

/// Nearest quarter turn to `angle`; plotters' `FontTransform` only rotates
/// text by multiples of 90 degrees.
fn rotation(angle: f64) -> FontTransform {
    match angle.rem_euclid(360.0) {
        a if (45.0..135.0).contains(&a) => FontTransform::Rotate90,
        a if (135.0..225.0).contains(&a) => FontTransform::Rotate180,
        a if (225.0..315.0).contains(&a) => FontTransform::Rotate270,
        _ => FontTransform::None,
    }
}

fn draw_text(root: &Root, layer: &Layer, positions: &[Option<Pixel>]) -> Result<()> {
    let Some(text) = layer.encoding.text.as_ref() else {
        return Ok(());
    };
    let style = &layer.mark.style;
    let font_style = match style.font_style {
        Some(FontStyle::Italic) => TextFontStyle::Italic,
        _ => TextFontStyle::Normal,
    };
    let font = FontDesc::new(
        FontFamily::Name(style.font.as_deref().unwrap_or(DEFAULT_FONT)),
        style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        font_style,
    )
    .transform(rotation(style.angle.unwrap_or(0.0)));
    let text_style = font
        .color(&mark_color(layer)?)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let (dx, dy) = (
        style.dx.unwrap_or(0.0).round() as i32,
        style.dy.unwrap_or(0.0).round() as i32,
    );

    for (datum, &at) in layer.data.values.iter().zip(positions) {
        let Some((x, y)) = at else {
            continue;
        };
        let label = datum
            .get(&text.field)
            .map(text_value)
            .ok_or_else(|| ChartError::MissingField {
                field: text.field.clone(),
            })?;
        root.draw(&Text::new(label, (x + dx, y + dy), text_style.clone()))?;
    }
    Ok(())
}
