//! Raw employee rows from a JSON export or a spreadsheet.
//!
//! Two JSON shapes are accepted:
//! - a top-level array of row objects
//! - a workbook-style object keyed by sheet name, whose first array-valued
//!   member holds the rows (first sheet wins)
//!
//! Spreadsheet files are recognized by extension and handed to
//! [`super::workbook`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::org::RawRow;

/// Which step of reading a row source failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The file could not be opened or read
    Read,
    /// The contents are not a usable row table
    Parse,
}

/// Error reading a row source
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
    pub kind: SourceErrorKind,
}

impl SourceError {
    pub fn read(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: SourceErrorKind::Read,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: SourceErrorKind::Parse,
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

/// Extensions read as spreadsheets rather than JSON.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.iter().any(|w| w.eq_ignore_ascii_case(e)))
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, SourceError> {
    let value: Value =
        serde_json::from_reader(reader).map_err(|e| SourceError::parse(format!("Invalid JSON: {}", e)))?;
    rows_from_value(value)
}

/// Read rows from a file, choosing the reader by extension.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let rows = if is_workbook(path) {
        super::workbook::load_workbook(path)?
    } else {
        let file = File::open(path).map_err(|e| SourceError::read(format!("{}: {}", path.display(), e)))?;
        read_rows(BufReader::new(file))?
    };
    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Extract the row array from an already parsed document.
pub fn rows_from_value(value: Value) -> Result<Vec<RawRow>, SourceError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(sheets) => {
            let found = sheets.into_iter().find_map(|(name, v)| match v {
                Value::Array(items) => Some((name, items)),
                _ => None,
            });
            match found {
                Some((sheet, items)) => {
                    log::debug!("Using sheet {:?}", sheet);
                    items
                }
                None => return Err(SourceError::parse("No row array found in document")),
            }
        }
        other => {
            return Err(SourceError::parse(format!(
                "Expected an array of rows, found {}",
                kind(&other)
            )))
        }
    };

    let total = items.len();
    let rows: Vec<RawRow> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(row) => Some(row),
            other => {
                log::warn!("Skipping row {}: expected an object, found {}", i, kind(&other));
                None
            }
        })
        .collect();
    if rows.len() < total {
        log::warn!("Skipped {} of {} rows", total - rows.len(), total);
    }
    Ok(rows)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
