//! Tabular projection of JSON records.
//!
//! A [`Table`] is a named, column-inferred row collection. Columns are never
//! declared up front; they are the union of keys observed across the source
//! records, and every row carries a cell (possibly null) for each column.

use super::value::{coerce, CellValue};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from a JSON array, one row per object element.
    ///
    /// Returns `None` for an empty array: no table is emitted at all. This
    /// is asymmetric with [`Table::from_object`], which always emits a
    /// one-row table, and callers depend on the asymmetry.
    ///
    /// Non-object elements contribute neither columns nor rows; an array
    /// mixing scalars and objects projects only the object entries.
    pub fn from_array(name: impl Into<String>, items: &[Value]) -> Option<Table> {
        if items.is_empty() {
            return None;
        }

        // First pass: column union over the object elements, first-seen order.
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for item in items {
            if let Value::Object(record) = item {
                for key in record.keys() {
                    if seen.insert(key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        // Second pass: materialize dense rows. A key absent from a record
        // lands as an explicit null cell, never as a missing entry.
        let mut rows = Vec::new();
        for item in items {
            if let Value::Object(record) = item {
                rows.push(
                    columns
                        .iter()
                        .map(|column| record.get(column).map_or(CellValue::Null, coerce))
                        .collect(),
                );
            }
        }

        Some(Table {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// Build a one-row table from a single JSON object. Columns are the
    /// object's keys in their natural enumeration order.
    pub fn from_object(name: impl Into<String>, record: &Map<String, Value>) -> Table {
        let columns: Vec<String> = record.keys().cloned().collect();
        let row: Vec<CellValue> = record.values().map(coerce).collect();
        Table {
            name: name.into(),
            columns,
            rows: vec![row],
        }
    }

    /// Build a one-row table from pre-coerced cells. Used for the synthetic
    /// `ReportData` table the generate endpoints always register.
    pub fn from_row(name: impl Into<String>, cells: Vec<(String, CellValue)>) -> Table {
        let (columns, row) = cells.into_iter().unzip();
        Table {
            name: name.into(),
            columns,
            rows: vec![row],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell lookup by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_array(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn empty_array_yields_no_table() {
        assert_eq!(Table::from_array("t", &[]), None);
    }

    #[test]
    fn single_empty_object_yields_one_row_zero_columns() {
        let table = Table::from_array("t", &as_array(json!([{}]))).unwrap();
        assert_eq!(table.columns().len(), 0);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn columns_are_the_union_of_keys_in_first_seen_order() {
        let items = as_array(json!([{"x": 1}, {"x": 1, "y": 2}]));
        let table = Table::from_array("t", &items).unwrap();
        assert_eq!(table.columns(), ["x", "y"]);
        assert_eq!(table.row_count(), 2);
        // The first row never saw "y"; it still has a cell for it.
        assert_eq!(table.cell(0, "y"), Some(&CellValue::Null));
        assert_eq!(table.cell(1, "y"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn homogeneous_arrays_keep_one_row_per_element() {
        let items = as_array(json!([
            {"name": "a", "qty": 1},
            {"name": "b", "qty": 2},
            {"name": "c", "qty": 3}
        ]));
        let table = Table::from_array("items", &items).unwrap();
        assert_eq!(table.columns(), ["name", "qty"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(2, "qty"), Some(&CellValue::Integer(3)));
    }

    #[test]
    fn scalar_elements_are_skipped_entirely() {
        let items = as_array(json!([1, {"x": "a"}, "noise", {"y": "b"}]));
        let table = Table::from_array("t", &items).unwrap();
        assert_eq!(table.columns(), ["x", "y"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn from_object_always_emits_exactly_one_row() {
        let table = Table::from_object("t", &Map::new());
        assert_eq!(table.columns().len(), 0);
        assert_eq!(table.row_count(), 1);

        let record = match json!({"y": 2, "z": "text"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let table = Table::from_object("t", &record);
        assert_eq!(table.columns(), ["y", "z"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "y"), Some(&CellValue::Integer(2)));
    }

    #[test]
    fn cell_lookup_misses_return_none() {
        let items = as_array(json!([{"x": 1}]));
        let table = Table::from_array("t", &items).unwrap();
        assert_eq!(table.cell(0, "missing"), None);
        assert_eq!(table.cell(5, "x"), None);
    }
}
