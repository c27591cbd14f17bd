//! Raw employee rows from the first worksheet of a spreadsheet.
//!
//! The first row of the sheet names the columns. Every later row becomes one
//! object keyed by those names; empty cells are left out and rows with no
//! values at all are skipped. Repeated header names get a `_1`, `_2`, …
//! suffix so no column is lost.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde_json::{Number, Value};

use crate::org::RawRow;

use super::rows::SourceError;

/// Open a workbook file and read its first sheet.
pub fn load_workbook(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::read(format!("{}: {}", path.display(), e)))?;
    read_workbook(Cursor::new(bytes)).map_err(|e| SourceError::parse(format!("{}: {}", path.display(), e)))
}

pub fn read_workbook<RS: Read + Seek + Clone>(data: RS) -> Result<Vec<RawRow>, SourceError> {
    let mut workbook =
        open_workbook_auto_from_rs(data).map_err(|e| SourceError::parse(format!("Invalid workbook: {}", e)))?;
    let sheet = workbook.sheet_names().into_iter().next();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::parse("Workbook has no sheets"))?
        .map_err(|e| SourceError::parse(format!("Unreadable sheet: {}", e)))?;
    log::debug!("Using sheet {:?}", sheet.unwrap_or_default());
    Ok(rows_from_range(&range))
}

/// Turn a sheet's cells into row objects, using the first row as header.
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns = column_names(header);

    let mut blank = 0;
    let rows: Vec<RawRow> = lines
        .filter_map(|cells| {
            let row: RawRow = columns
                .iter()
                .zip(cells)
                .filter_map(|(name, cell)| Some((name.clone()?, cell_value(cell)?)))
                .collect();
            if row.is_empty() {
                blank += 1;
                None
            } else {
                Some(row)
            }
        })
        .collect();
    if blank > 0 {
        log::debug!("Skipped {} blank rows", blank);
    }
    rows
}

fn column_names(header: &[Data]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .map(|cell| {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() {
                return None;
            }
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = match *count {
                0 => name,
                n => format!("{}_{}", name, n),
            };
            *count += 1;
            Some(unique)
        })
        .collect()
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => number(*f),
        Data::Bool(b) => Some(Value::Bool(*b)),
        // Serial day number, as the sheet stores it
        Data::DateTime(dt) => number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
        Data::Error(e) => {
            log::debug!("Ignoring cell error {:?}", e);
            None
        }
    }
}

/// Spreadsheets store every number as a float; whole ones come back as
/// integers so ids read the same as in a JSON export.
fn number(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        Some(Value::from(f as i64))
    } else {
        Number::from_f64(f).map(Value::Number)
    }
}
