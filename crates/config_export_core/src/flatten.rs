//! Key-path flattening of heterogeneous records into a table.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::result_set::Record;

pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTable {
    /// Union of all flattened paths, in order of first appearance.
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl FlatTable {
    /// Every row with cells aligned to `columns`; absent fields are empty.
    pub fn aligned_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
                .collect()
        })
    }
}

/// Flattens one record into `(dotted path, cell)` pairs in field order.
///
/// Nested objects recurse; arrays are leaves rendered as compact JSON; an
/// empty nested object produces no cell.
pub fn flatten_record(record: &Record) -> Vec<(String, String)> {
    let mut cells = Vec::new();
    for (key, value) in record {
        flatten_value(key.clone(), value, &mut cells);
    }
    cells
}

fn flatten_value(path: String, value: &Value, cells: &mut Vec<(String, String)>) {
    match value {
        Value::Object(fields) => {
            for (key, nested) in fields {
                flatten_value(format!("{path}{PATH_SEPARATOR}{key}"), nested, cells);
            }
        }
        leaf => cells.push((path, render_cell(leaf))),
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn flatten_records(records: &[Record]) -> FlatTable {
    let mut seen = HashSet::new();
    let mut table = FlatTable::default();

    for record in records {
        let cells = flatten_record(record);
        let mut row = HashMap::with_capacity(cells.len());
        for (path, cell) in cells {
            if seen.insert(path.clone()) {
                table.columns.push(path.clone());
            }
            row.insert(path, cell);
        }
        table.rows.push(row);
    }

    table
}
