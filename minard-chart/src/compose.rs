//! Assembly of the two-panel campaign figure.
//!
//! Map panel, bottom to top: troop trail, city labels, survivor labels and an
//! invisible layer that carries the explicit x/y axes. The temperature panel
//! sits below it and shares its longitude domain.

use crate::error::{ChartError, Result};
use crate::model::{
    layer, vconcat, Axis, AxisConfig, AxisOrient, ChartConfig, CompositeChart, Encoding,
    FieldDef, FontStyle, Layer, Mark, MarkStyle, MarkType, Panel, Scale, ViewConfig,
};
use crate::scale::extent;
use crate::style::{city_label, figure, map, temperature, trail, troop_label};
use log::{debug, info, warn};
use minard_data::{ArmyRecord, CityRecord, Direction, TemperatureRecord};

/// Every `STRIDE`-th troop position, counted from the first, nudged so that
/// labels of overlapping divisions and of both directions separate. A label
/// whose offset depends on an empty cell loses that coordinate and is not
/// drawn.
pub fn troop_labels(army: &[ArmyRecord]) -> Vec<ArmyRecord> {
    army.iter()
        .step_by(troop_label::STRIDE)
        .map(|record| ArmyRecord {
            lon: record.lon.zip(record.division).map(|(lon, division)| {
                lon + troop_label::LON_OFFSET_PER_DIVISION * f64::from(division)
            }),
            lat: record.lat.zip(record.dir).map(|(lat, dir)| {
                lat + match dir {
                    Direction::Advance => troop_label::ADVANCE_LAT_OFFSET,
                    Direction::Retreat => troop_label::RETREAT_LAT_OFFSET,
                }
            }),
            ..record.clone()
        })
        .collect()
}

/// Longitude extent of the troops, shared by both panels. Positions with an
/// empty longitude are ignored.
pub fn lon_domain(army: &[ArmyRecord]) -> Result<(f64, f64)> {
    let (min, max) = extent(army.iter().filter_map(|record| record.lon))
        .ok_or(ChartError::EmptyDataset { dataset: "army" })?;
    if min == max {
        warn!(
            "all troop positions lie on longitude {}; widening the domain by {} degrees",
            min,
            map::DEGENERATE_LON_PADDING
        );
        return Ok((
            min - map::DEGENERATE_LON_PADDING,
            max + map::DEGENERATE_LON_PADDING,
        ));
    }
    Ok((min, max))
}

/// Latitude extent of the troops, padded on both sides.
pub fn lat_domain(army: &[ArmyRecord]) -> Result<(f64, f64)> {
    let (min, max) = extent(army.iter().filter_map(|record| record.lat))
        .ok_or(ChartError::EmptyDataset { dataset: "army" })?;
    Ok((min - map::LAT_PADDING, max + map::LAT_PADDING))
}

/// Temperature extent, padded on both sides.
pub fn temp_domain(temperatures: &[TemperatureRecord]) -> Result<(f64, f64)> {
    let (min, max) = extent(temperatures.iter().map(|record| record.temp)).ok_or(
        ChartError::EmptyDataset {
            dataset: "temperatures",
        },
    )?;
    Ok((min - temperature::TEMP_PADDING, max + temperature::TEMP_PADDING))
}

fn lon_axis(domain: (f64, f64)) -> FieldDef {
    FieldDef::quantitative("lon")
        .scale(Scale::with_domain(domain.0, domain.1))
        .axis(Axis {
            title: Some(map::LON_TITLE.to_string()),
            grid: Some(true),
            orient: None,
        })
}

fn right_axis(field: &str, title: &str, domain: (f64, f64)) -> FieldDef {
    FieldDef::quantitative(field)
        .scale(Scale::with_domain(domain.0, domain.1))
        .axis(Axis {
            title: Some(title.to_string()),
            grid: Some(true),
            orient: Some(AxisOrient::Right),
        })
}

fn geo_encoding() -> Encoding {
    Encoding {
        longitude: Some(FieldDef::quantitative("lon")),
        latitude: Some(FieldDef::quantitative("lat")),
        ..Default::default()
    }
}

fn italic_text(font: &str, font_size: f64) -> MarkStyle {
    MarkStyle {
        font: Some(font.to_string()),
        font_size: Some(font_size),
        font_style: Some(FontStyle::Italic),
        ..Default::default()
    }
}

fn map_panel(army: &[ArmyRecord], cities: &[CityRecord], lon: (f64, f64)) -> Result<Panel> {
    let trail_layer = Layer::new(
        Mark::new(MarkType::Trail),
        army,
        Encoding {
            size: Some(
                FieldDef::quantitative("surv")
                    .scale(Scale::with_range(trail::SIZE_RANGE.0, trail::SIZE_RANGE.1))
                    .no_legend(),
            ),
            detail: Some(FieldDef::quantitative("division")),
            color: Some(
                FieldDef::nominal("dir")
                    .scale(Scale::categorical(
                        &[Direction::Advance.code(), Direction::Retreat.code()],
                        &[trail::ADVANCE_COLOR, trail::RETREAT_COLOR],
                    ))
                    .no_legend(),
            ),
            ..geo_encoding()
        },
    )?;

    let city_layer = Layer::new(
        Mark::styled(
            MarkType::Text,
            MarkStyle {
                dx: Some(city_label::DX),
                ..italic_text(city_label::FONT, city_label::FONT_SIZE)
            },
        ),
        cities,
        Encoding {
            text: Some(FieldDef::nominal("city")),
            ..geo_encoding()
        },
    )?;

    let labels = troop_labels(army);
    debug!("{} of {} troop positions labelled", labels.len(), army.len());
    let troop_label_layer = Layer::new(
        Mark::styled(
            MarkType::Text,
            MarkStyle {
                angle: Some(troop_label::ANGLE),
                ..italic_text(troop_label::FONT, troop_label::FONT_SIZE)
            },
        ),
        &labels,
        Encoding {
            text: Some(FieldDef::quantitative("surv")),
            ..geo_encoding()
        },
    )?;

    let axis_layer = Layer::new(
        Mark::new(MarkType::Text),
        army,
        Encoding {
            x: Some(lon_axis(lon)),
            y: Some(right_axis("lat", map::LAT_TITLE, lat_domain(army)?)),
            ..Default::default()
        },
    )?;

    Ok(layer([trail_layer, city_layer, troop_label_layer, axis_layer]))
}

fn temperature_panel(temperatures: &[TemperatureRecord], lon: (f64, f64)) -> Result<Panel> {
    let encoding = Encoding {
        x: Some(lon_axis(lon)),
        y: Some(right_axis(
            "temp",
            temperature::TITLE,
            temp_domain(temperatures)?,
        )),
        ..Default::default()
    };

    let line_layer = Layer::new(
        Mark::styled(
            MarkType::Line,
            MarkStyle {
                color: Some(temperature::LINE_COLOR.to_string()),
                ..Default::default()
            },
        ),
        temperatures,
        encoding.clone(),
    )?;

    let label_layer = Layer::new(
        Mark::styled(
            MarkType::Text,
            MarkStyle {
                dx: Some(temperature::LABEL_DX),
                dy: Some(temperature::LABEL_DY),
                font: Some(temperature::LABEL_FONT.to_string()),
                font_size: Some(temperature::LABEL_FONT_SIZE),
                ..Default::default()
            },
        ),
        temperatures,
        Encoding {
            text: Some(FieldDef::nominal("date")),
            ..encoding
        },
    )?;

    Ok(layer([line_layer, label_layer]).with_height(temperature::HEIGHT))
}

/// Figure-level view and axis styling.
pub fn figure_config() -> ChartConfig {
    ChartConfig {
        view: ViewConfig {
            width: figure::VIEW_WIDTH,
            height: figure::VIEW_HEIGHT,
            stroke_width: figure::VIEW_STROKE_WIDTH,
        },
        axis: AxisConfig {
            grid: true,
            label_font: figure::AXIS_FONT.to_string(),
            title_font: figure::AXIS_FONT.to_string(),
        },
    }
}

/// Build the composite figure: map panel on top, temperature panel below.
///
/// Fails when the troop or temperature records are empty, since no axis
/// domain can be derived from them.
pub fn compose_chart(
    temperatures: &[TemperatureRecord],
    army: &[ArmyRecord],
    cities: &[CityRecord],
) -> Result<CompositeChart> {
    let lon = lon_domain(army)?;
    let chart = vconcat(
        [
            map_panel(army, cities, lon)?,
            temperature_panel(temperatures, lon)?,
        ],
        figure_config(),
    );
    info!(
        "composed chart: {} troop positions, {} cities, {} temperature readings",
        army.len(),
        cities.len(),
        temperatures.len()
    );
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScaleValues;
    use serde_json::json;

    fn troop(lon: f64, lat: f64, surv: u32, dir: Direction, division: u32) -> ArmyRecord {
        ArmyRecord {
            lon: Some(lon),
            lat: Some(lat),
            surv: Some(surv),
            dir: Some(dir),
            division: Some(division),
        }
    }

    fn reading(lon: f64, temp: f64) -> TemperatureRecord {
        TemperatureRecord {
            lon: Some(lon),
            temp,
            days: Some(1.0),
            date: format!("{}°C  ", temp),
        }
    }

    #[test]
    fn test_troop_labels_decimate_and_offset() {
        let army = vec![
            troop(24.0, 55.0, 300, Direction::Advance, 2),
            troop(25.0, 55.0, 200, Direction::Advance, 2),
            troop(26.0, 54.0, 100, Direction::Retreat, 1),
        ];
        let labels = troop_labels(&army);
        assert_eq!(labels.len(), 2);
        assert!((labels[0].lon.unwrap() - 24.26).abs() < 1e-9);
        assert!((labels[0].lat.unwrap() - 55.35).abs() < 1e-9);
        assert_eq!(labels[0].surv, Some(300));
        assert!((labels[1].lon.unwrap() - 26.13).abs() < 1e-9);
        assert!((labels[1].lat.unwrap() - 53.79).abs() < 1e-9);
        assert_eq!(labels[1].surv, Some(100));
        // the input is left untouched
        assert_eq!(army[0].lon, Some(24.0));
    }

    #[test]
    fn test_troop_labels_with_empty_cells() {
        let mut no_division = troop(24.0, 55.0, 300, Direction::Advance, 1);
        no_division.division = None;
        let mut no_direction = troop(25.0, 55.0, 200, Direction::Advance, 1);
        no_direction.dir = None;
        let labels = troop_labels(&[
            no_division,
            troop(30.0, 55.0, 1, Direction::Advance, 1),
            no_direction,
        ]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].lon, None);
        assert!((labels[0].lat.unwrap() - 55.35).abs() < 1e-9);
        assert!((labels[1].lon.unwrap() - 25.13).abs() < 1e-9);
        assert_eq!(labels[1].lat, None);
    }

    #[test]
    fn test_domains_skip_empty_coordinates() {
        let mut gap = troop(40.0, 60.0, 100, Direction::Advance, 1);
        gap.lon = None;
        gap.lat = None;
        let army = vec![
            troop(24.0, 54.9, 300, Direction::Advance, 1),
            gap,
            troop(37.6, 55.8, 100, Direction::Advance, 1),
        ];
        assert_eq!(lon_domain(&army).unwrap(), (24.0, 37.6));
        let (lat_min, lat_max) = lat_domain(&army).unwrap();
        assert!((lat_min - 53.9).abs() < 1e-9);
        assert!((lat_max - 56.8).abs() < 1e-9);

        let mut unplaced = troop(24.0, 55.0, 100, Direction::Advance, 1);
        unplaced.lon = None;
        assert!(matches!(
            lon_domain(&[unplaced]),
            Err(ChartError::EmptyDataset { dataset: "army" })
        ));
    }

    #[test]
    fn test_troop_label_count_is_half_rounded_up() {
        for n in 0..7 {
            let army: Vec<ArmyRecord> = (0..n)
                .map(|i| troop(24.0 + i as f64, 55.0, 100, Direction::Advance, 1))
                .collect();
            assert_eq!(troop_labels(&army).len(), (n + 1) / 2);
        }
    }

    #[test]
    fn test_domains() {
        let army = vec![
            troop(24.0, 54.9, 300, Direction::Advance, 1),
            troop(37.6, 55.8, 100, Direction::Advance, 1),
        ];
        assert_eq!(lon_domain(&army).unwrap(), (24.0, 37.6));
        let (lat_min, lat_max) = lat_domain(&army).unwrap();
        assert!((lat_min - 53.9).abs() < 1e-9);
        assert!((lat_max - 56.8).abs() < 1e-9);
        let temps = vec![reading(37.6, 0.0), reading(25.3, -30.0)];
        assert_eq!(temp_domain(&temps).unwrap(), (-40.0, 10.0));
    }

    #[test]
    fn test_single_meridian_is_widened() {
        let army = vec![troop(30.0, 55.0, 100, Direction::Advance, 1)];
        assert_eq!(lon_domain(&army).unwrap(), (29.5, 30.5));
    }

    #[test]
    fn test_empty_inputs_fail_fast() {
        let army = vec![troop(30.0, 55.0, 100, Direction::Advance, 1)];
        let temps = vec![reading(30.0, -10.0)];
        assert!(matches!(
            compose_chart(&temps, &[], &[]),
            Err(ChartError::EmptyDataset { dataset: "army" })
        ));
        assert!(matches!(
            compose_chart(&[], &army, &[]),
            Err(ChartError::EmptyDataset {
                dataset: "temperatures"
            })
        ));
        assert!(compose_chart(&temps, &army, &[]).is_ok());
    }

    #[test]
    fn test_composition_order_and_shared_domain() {
        let army = vec![
            troop(24.0, 55.0, 100, Direction::Advance, 1),
            troop(37.6, 55.8, 50, Direction::Retreat, 2),
        ];
        let cities = vec![CityRecord {
            lon: Some(37.6),
            lat: Some(55.8),
            city: "Moscou".to_string(),
        }];
        let temps = vec![reading(37.6, 0.0)];
        let chart = compose_chart(&temps, &army, &cities).unwrap();
        let panels = chart.panels();
        assert_eq!(panels.len(), 2);

        let map_kinds: Vec<MarkType> = panels[0].layer.iter().map(|l| l.mark.kind).collect();
        assert_eq!(
            map_kinds,
            vec![MarkType::Trail, MarkType::Text, MarkType::Text, MarkType::Text]
        );
        assert_eq!(panels[0].layer[1].encoding.text.as_ref().unwrap().field, "city");
        assert_eq!(panels[0].layer[2].encoding.text.as_ref().unwrap().field, "surv");
        assert!(panels[0].layer[3].encoding.text.is_none());
        assert_eq!(panels[0].height, None);
        assert_eq!(panels[1].height, Some(temperature::HEIGHT));

        let map_x = panels[0].layer[3].encoding.x.as_ref().unwrap();
        let temp_x = panels[1].layer[0].encoding.x.as_ref().unwrap();
        assert_eq!(map_x.scale, temp_x.scale);
        assert_eq!(
            map_x.scale.as_ref().unwrap().domain,
            Some(ScaleValues::Numbers(vec![24.0, 37.6]))
        );
        assert_eq!(
            panels[0].layer[3].encoding.y.as_ref().unwrap().axis.as_ref().unwrap().orient,
            Some(AxisOrient::Right)
        );
    }

    #[test]
    fn test_vega_lite_styling() {
        let army = vec![troop(24.0, 55.0, 100, Direction::Advance, 1)];
        let temps = vec![reading(24.0, -20.0)];
        let document = compose_chart(&temps, &army, &[])
            .unwrap()
            .to_vega_lite()
            .unwrap();
        let trail_layer = &document["vconcat"][0]["layer"][0];
        assert_eq!(trail_layer["mark"], json!({"type": "trail"}));
        assert_eq!(
            trail_layer["encoding"]["color"]["scale"]["range"],
            json!(["#FFE0B2", "#A1887F"])
        );
        assert_eq!(trail_layer["encoding"]["size"]["scale"]["range"], json!([1.0, 75.0]));
        assert_eq!(trail_layer["encoding"]["size"]["legend"], json!(null));
        assert_eq!(trail_layer["data"]["values"][0]["dir"], "A");
        let line_layer = &document["vconcat"][1]["layer"][0];
        assert_eq!(line_layer["mark"]["color"], "#F44336");
        let text_layer = &document["vconcat"][1]["layer"][1];
        assert_eq!(text_layer["mark"]["font"], "Copperplate");
        assert_eq!(text_layer["mark"]["fontSize"], 14.0);
        assert_eq!(document["config"]["view"]["width"], 1200);
        assert_eq!(document["config"]["view"]["height"], 800);
        assert_eq!(document["config"]["axis"]["titleFont"], "Copperplate");
    }
}
