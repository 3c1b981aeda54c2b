//! Workbook reading: sheet selection and row extraction via calamine.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Cursor;

use super::{normalize_key, ImportError};
use crate::parsing::RawValue;
use crate::Result;

/// Sheet name preferred over the first sheet, compared case-insensitively.
const PREFERRED_SHEET: &str = "transactions";

/// One data row, keyed by normalized column name. `number` is the
/// operator-facing row number: 1-indexed with a header offset of 1, so the
/// first data row reports as row 2.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub number: usize,
    pub cells: BTreeMap<String, RawValue>,
    /// The row as originally spelled, kept for the transaction `meta` blob.
    pub original: Value,
}

impl SheetRow {
    /// Builds a row from `(header, value)` pairs, normalizing keys and
    /// capturing the original spelling.
    pub fn new(number: usize, pairs: Vec<(String, RawValue)>) -> Self {
        let mut cells = BTreeMap::new();
        let mut original = Map::new();
        for (header, value) in pairs {
            original.insert(header.clone(), raw_to_json(&value));
            cells.insert(normalize_key(&header), value);
        }
        Self {
            number,
            cells,
            original: Value::Object(original),
        }
    }
}

/// A selected sheet reduced to its data rows.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

/// Reads the uploaded workbook and selects the transactions sheet: a sheet
/// literally named "Transactions" (case-insensitive) wins, else the first
/// sheet. A workbook with no sheets at all is a hard input error.
pub fn read_transactions_sheet(bytes: &[u8]) -> Result<SheetData> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;

    let names = workbook.sheet_names().to_owned();
    let name = names
        .iter()
        .find(|n| n.to_lowercase() == PREFERRED_SHEET)
        .or_else(|| names.first())
        .cloned()
        .ok_or(ImportError::EmptyWorkbook)?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ImportError::UnreadableSheet(name.clone(), e.to_string()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| RawValue::from_cell(cell).display())
            .collect(),
        None => return Ok(SheetData { name, rows: Vec::new() }),
    };

    let mut rows = Vec::new();
    for (index, data_row) in rows_iter.enumerate() {
        if data_row.iter().all(is_blank_cell) {
            continue;
        }
        let pairs: Vec<(String, RawValue)> = headers
            .iter()
            .zip(data_row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), RawValue::from_cell(cell)))
            .collect();
        rows.push(SheetRow::new(index + 2, pairs));
    }

    Ok(SheetData { name, rows })
}

fn is_blank_cell(cell: &Data) -> bool {
    RawValue::from_cell(cell).is_empty()
}

fn raw_to_json(value: &RawValue) -> Value {
    match value {
        RawValue::Empty => Value::Null,
        RawValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        RawValue::Text(s) => Value::String(s.clone()),
        RawValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
    }
}
