use crate::error::{DataError, Result};
use crate::table::{SourceRow, SourceTable};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// March direction of a troop position.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "A")]
    Advance,
    #[serde(rename = "R")]
    Retreat,
}

impl Direction {
    /// The single-letter code used in the source table and chart data.
    pub fn code(&self) -> &'static str {
        match self {
            Direction::Advance => "A",
            Direction::Retreat => "R",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A troop position with its survivor count.
///
/// Every field is optional: a troop row keeps its place in the dataset even
/// when some of its cells are empty, and consumers skip what they cannot use.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ArmyRecord {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub surv: Option<u32>,
    pub dir: Option<Direction>,
    pub division: Option<u32>,
}

impl ArmyRecord {
    fn from_row(row: &SourceRow, table: &SourceTable) -> Result<ArmyRecord> {
        let schema = table.schema();
        let dir = match row.direction.as_deref() {
            None => None,
            Some("A") => Some(Direction::Advance),
            Some("R") => Some(Direction::Retreat),
            Some(other) => {
                return Err(DataError::UnknownDirection {
                    row: row.line,
                    value: other.to_string(),
                })
            }
        };
        Ok(ArmyRecord {
            lon: row.army_lon,
            lat: row.army_lat,
            surv: row
                .survivors
                .map(|value| to_count(value, row.line, &schema.survivors))
                .transpose()?,
            dir,
            division: row
                .division
                .map(|value| to_count(value, row.line, &schema.division))
                .transpose()?,
        })
    }
}

fn to_count(value: f64, row: usize, column: &str) -> Result<u32> {
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(DataError::NotAnInteger {
            row,
            column: column.to_string(),
            value,
        });
    }
    Ok(value as u32)
}

/// Descending order with absent values last.
fn descending(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Draw order of troop positions: division descending, then survivors
/// descending. Empty cells sort after every value.
pub fn draw_order(a: &ArmyRecord, b: &ArmyRecord) -> Ordering {
    descending(a.division, b.division).then_with(|| descending(a.surv, b.surv))
}

/// Collect every troop row and sort it into draw order.
///
/// No troop row is filtered out, including rows with empty cells. Rows
/// carrying no troop column at all are padding of the wide table and are not
/// troop rows. The sort is stable, so ties keep their source order.
pub fn extract_army(table: &SourceTable) -> Result<Vec<ArmyRecord>> {
    let mut army = table
        .rows()
        .iter()
        .filter(|row| row.has_troop_data())
        .map(|row| ArmyRecord::from_row(row, table))
        .collect::<Result<Vec<ArmyRecord>>>()?;
    army.sort_by(draw_order);
    debug!("extracted {} troop positions", army.len());
    Ok(army)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::SourceSchema, MINARD_CSV};

    fn troop(lon: f64, surv: f64, dir: &str, division: f64) -> SourceRow {
        SourceRow {
            army_lon: Some(lon),
            army_lat: Some(55.0),
            survivors: Some(surv),
            direction: Some(dir.to_string()),
            division: Some(division),
            ..Default::default()
        }
    }

    #[test]
    fn test_sorted_by_division_then_survivors() {
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![
                troop(24.0, 340000.0, "A", 1.0),
                troop(24.0, 60000.0, "A", 2.0),
                troop(37.6, 100000.0, "A", 1.0),
                troop(24.1, 4000.0, "R", 1.0),
                troop(24.5, 60000.0, "A", 2.0),
            ],
        );
        let army = extract_army(&table).unwrap();
        let order: Vec<(Option<u32>, Option<u32>, Option<f64>)> = army
            .iter()
            .map(|record| (record.division, record.surv, record.lon))
            .collect();
        assert_eq!(
            order,
            vec![
                (Some(2), Some(60000), Some(24.0)),
                (Some(2), Some(60000), Some(24.5)),
                (Some(1), Some(340000), Some(24.0)),
                (Some(1), Some(100000), Some(37.6)),
                (Some(1), Some(4000), Some(24.1)),
            ]
        );
    }

    #[test]
    fn test_padding_rows_are_not_troops() {
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![
                SourceRow {
                    city: Some("Kowno".to_string()),
                    city_lon: Some(24.0),
                    city_lat: Some(55.0),
                    ..Default::default()
                },
                troop(24.0, 100.0, "A", 1.0),
            ],
        );
        assert_eq!(extract_army(&table).unwrap().len(), 1);
    }

    #[test]
    fn test_rows_with_empty_cells_are_kept() {
        let csv_data = "\
LONC,LATC,CITY,LONT,TEMP,DAYS,MON,DAY,LONP,LATP,SURV,DIR,DIV
,,,,,,,,24,55,100,A,1
,,,,,,,,25,55,,A,1
";
        let table = SourceTable::from_csv_str(csv_data, &SourceSchema::default()).unwrap();
        let army = extract_army(&table).unwrap();
        assert_eq!(army.len(), 2);
        assert_eq!(army[0].surv, Some(100));
        assert_eq!(army[1].lon, Some(25.0));
        assert_eq!(army[1].surv, None);
        assert_eq!(army[1].dir, Some(Direction::Advance));
    }

    #[test]
    fn test_empty_cells_sort_last() {
        let mut no_division = troop(26.0, 500.0, "R", 1.0);
        no_division.division = None;
        let mut no_survivors = troop(25.0, 0.0, "A", 1.0);
        no_survivors.survivors = None;
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![
                no_division,
                no_survivors,
                troop(24.0, 100.0, "A", 1.0),
                troop(24.0, 50.0, "A", 2.0),
            ],
        );
        let order: Vec<(Option<u32>, Option<u32>)> = extract_army(&table)
            .unwrap()
            .iter()
            .map(|record| (record.division, record.surv))
            .collect();
        assert_eq!(
            order,
            vec![
                (Some(2), Some(50)),
                (Some(1), Some(100)),
                (Some(1), None),
                (None, Some(500)),
            ]
        );
    }

    #[test]
    fn test_empty_direction_is_kept() {
        let mut row = troop(24.0, 100.0, "A", 1.0);
        row.direction = None;
        let table = SourceTable::from_rows(SourceSchema::default(), vec![row]);
        let army = extract_army(&table).unwrap();
        assert_eq!(army[0].dir, None);
        assert_eq!(army[0].lat, Some(55.0));
    }

    #[test]
    fn test_unknown_direction() {
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![troop(24.0, 100.0, "X", 1.0)],
        );
        assert!(matches!(
            extract_army(&table),
            Err(DataError::UnknownDirection { row: 1, .. })
        ));
    }

    #[test]
    fn test_fractional_survivors_rejected() {
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![troop(24.0, 100.5, "A", 1.0)],
        );
        assert!(matches!(
            extract_army(&table),
            Err(DataError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_fixture_order_invariant() {
        let table = SourceTable::from_csv_str(MINARD_CSV, &SourceSchema::default()).unwrap();
        let army = extract_army(&table).unwrap();
        assert_eq!(army.len(), 50);
        assert_eq!(army[0].division, Some(3));
        assert_eq!(army[army.len() - 1].division, Some(1));
        for pair in army.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            assert!(
                first.division > second.division
                    || (first.division == second.division && first.surv >= second.surv)
            );
        }
    }

    #[test]
    fn test_direction_serializes_as_code() {
        assert_eq!(
            serde_json::to_string(&Direction::Retreat).unwrap(),
            "\"R\""
        );
        assert_eq!(Direction::Advance.to_string(), "A");
    }
}
