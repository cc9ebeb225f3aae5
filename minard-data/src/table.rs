use crate::error::{DataError, Result};
use crate::schema::{ColumnIndex, SourceSchema};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::{io::Read, path::Path};

/// Cell values treated as "no data" in addition to empty text.
const MISSING_TOKENS: &[&str] = &["NaN", "nan", "NA"];

/// One row of the wide campaign table. Every cell is optional because each
/// column group is padded with empty cells where it runs out of data.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SourceRow {
    /// 1-based data row number, used in error messages
    pub line: usize,
    pub city_lon: Option<f64>,
    pub city_lat: Option<f64>,
    pub city: Option<String>,
    pub temp_lon: Option<f64>,
    pub temp: Option<f64>,
    pub days: Option<f64>,
    pub month: Option<String>,
    pub day: Option<f64>,
    pub army_lon: Option<f64>,
    pub army_lat: Option<f64>,
    pub survivors: Option<f64>,
    pub direction: Option<String>,
    pub division: Option<f64>,
}

impl SourceRow {
    fn from_record(
        record: &StringRecord,
        index: &ColumnIndex,
        schema: &SourceSchema,
        line: usize,
    ) -> Result<SourceRow> {
        let number = |position: usize, column: &str| parse_number(record.get(position), line, column);
        let text = |position: usize| parse_text(record.get(position));
        Ok(SourceRow {
            line,
            city_lon: number(index.city_lon, &schema.city_lon)?,
            city_lat: number(index.city_lat, &schema.city_lat)?,
            city: text(index.city),
            temp_lon: number(index.temp_lon, &schema.temp_lon)?,
            temp: number(index.temp, &schema.temp)?,
            days: number(index.days, &schema.days)?,
            month: text(index.month),
            day: number(index.day, &schema.day)?,
            army_lon: number(index.army_lon, &schema.army_lon)?,
            army_lat: number(index.army_lat, &schema.army_lat)?,
            survivors: number(index.survivors, &schema.survivors)?,
            direction: text(index.direction),
            division: number(index.division, &schema.division)?,
        })
    }

    /// True when no cell of the row holds a value.
    pub fn is_blank(&self) -> bool {
        self.city_lon.is_none()
            && self.city_lat.is_none()
            && self.city.is_none()
            && self.temp_lon.is_none()
            && self.temp.is_none()
            && self.days.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && !self.has_troop_data()
    }

    /// True when any of the troop columns holds a value.
    pub fn has_troop_data(&self) -> bool {
        self.army_lon.is_some()
            || self.army_lat.is_some()
            || self.survivors.is_some()
            || self.direction.is_some()
            || self.division.is_some()
    }
}

/// The immutable source table every extractor reads from.
#[derive(Debug, PartialEq, Clone)]
pub struct SourceTable {
    schema: SourceSchema,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Read a headered CSV. The header is validated against `schema` before
    /// any data row is parsed.
    pub fn from_reader<R: Read>(reader: R, schema: &SourceSchema) -> Result<SourceTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let index = schema.resolve(&headers)?;

        let mut rows = Vec::new();
        for (position, result) in rdr.records().enumerate() {
            let record = result?;
            rows.push(SourceRow::from_record(&record, &index, schema, position + 1)?);
        }
        debug!("source table: {} rows, {} columns", rows.len(), headers.len());
        Ok(SourceTable {
            schema: schema.clone(),
            rows,
        })
    }

    /// Parse a CSV string.
    pub fn from_csv_str(csv_data: &str, schema: &SourceSchema) -> Result<SourceTable> {
        SourceTable::from_reader(csv_data.as_bytes(), schema)
    }

    /// Read a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P, schema: &SourceSchema) -> Result<SourceTable> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        SourceTable::from_reader(file, schema)
    }

    /// Build a table from rows already in memory. Rows are renumbered in
    /// order so error messages point at their position.
    pub fn from_rows(schema: SourceSchema, rows: Vec<SourceRow>) -> SourceTable {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(position, row)| SourceRow {
                line: position + 1,
                ..row
            })
            .collect();
        SourceTable { schema, rows }
    }

    pub fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.contains(&cell)
}

fn parse_text(cell: Option<&str>) -> Option<String> {
    let cell = cell?.trim();
    if is_missing(cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

fn parse_number(cell: Option<&str>, row: usize, column: &str) -> Result<Option<f64>> {
    let Some(cell) = cell.map(str::trim) else {
        return Ok(None);
    };
    if is_missing(cell) {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceRow, SourceTable};
    use crate::{error::DataError, schema::SourceSchema, MINARD_CSV};

    const HEADER: &str = "LONC,LATC,CITY,LONT,TEMP,DAYS,MON,DAY,LONP,LATP,SURV,DIR,DIV\n";

    #[test]
    fn test_parse_wide_rows() {
        let csv_data = format!(
            "{HEADER}24.0,55.0,Kowno,37.6,0,6,Oct,18,24.0,54.9,340000,A,1\n,,,,,,,,24.5,55.0,340000,A,1\n"
        );
        let table = SourceTable::from_csv_str(&csv_data, &SourceSchema::default()).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.line, 1);
        assert_eq!(first.city.as_deref(), Some("Kowno"));
        assert_eq!(first.month.as_deref(), Some("Oct"));
        assert_eq!(first.day, Some(18.0));
        assert_eq!(first.survivors, Some(340000.0));
        let second = &table.rows()[1];
        assert_eq!(second.line, 2);
        assert!(second.city.is_none());
        assert!(second.temp.is_none());
        assert!(second.has_troop_data());
    }

    #[test]
    fn test_missing_tokens_and_short_records() {
        let csv_data = format!("{HEADER}NaN,nan, ,NA\n");
        let table = SourceTable::from_csv_str(&csv_data, &SourceSchema::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0].is_blank());
    }

    #[test]
    fn test_invalid_number() {
        let csv_data = format!("{HEADER},,,,cold,,,,,,,,\n");
        match SourceTable::from_csv_str(&csv_data, &SourceSchema::default()) {
            Err(DataError::InvalidNumber { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "TEMP");
                assert_eq!(value, "cold");
            }
            other => panic!("expected invalid number, got {:?}", other),
        }
    }

    #[test]
    fn test_infinite_number_rejected() {
        let csv_data = format!("{HEADER},,,,inf,,,,,,,,\n");
        assert!(matches!(
            SourceTable::from_csv_str(&csv_data, &SourceSchema::default()),
            Err(DataError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_schema_checked_before_rows() {
        let csv_data = "LONC,LATC,CITY\nnot-a-number,,\n";
        assert!(matches!(
            SourceTable::from_csv_str(csv_data, &SourceSchema::default()),
            Err(DataError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_from_rows_renumbers() {
        let table = SourceTable::from_rows(
            SourceSchema::default(),
            vec![SourceRow::default(), SourceRow::default()],
        );
        assert_eq!(table.rows()[1].line, 2);
        assert!(table.rows()[0].is_blank());
    }

    #[test]
    fn test_embedded_fixture() {
        let table = SourceTable::from_csv_str(MINARD_CSV, &SourceSchema::default()).unwrap();
        assert_eq!(table.len(), 50);
        assert!(table.rows().iter().all(|row| row.has_troop_data()));
        assert_eq!(table.rows().iter().filter(|row| row.city.is_some()).count(), 20);
        assert_eq!(table.rows().iter().filter(|row| row.temp.is_some()).count(), 9);
    }
}
