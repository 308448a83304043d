//! JSON to tabular dataset projection.
//!
//! This module turns one inbound JSON document into the named collection of
//! tables a report engine binds against. Assembly cannot fail: malformed or
//! unexpected shapes degrade per the rules in [`Dataset::from_root`] instead
//! of raising. One dataset is built per request and dropped with it.

pub mod table;
pub mod value;

pub use table::Table;
pub use value::{coerce, CellValue};

use serde_json::{Map, Value};

/// Named collection of [`Table`]s produced for one rendering request.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    tables: Vec<Table>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Dataset {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Assemble a dataset from a top-level JSON object.
    ///
    /// Per top-level key:
    /// - array value: projected via [`Table::from_array`]; an empty array
    ///   yields no table and the key is simply absent from the dataset,
    /// - object value: always added as a one-row table,
    /// - scalar or null value: silently dropped; only record-shaped entries
    ///   surface as tables.
    pub fn from_root(name: impl Into<String>, root: &Map<String, Value>) -> Dataset {
        let mut dataset = Dataset::new(name);
        for (key, value) in root {
            match value {
                Value::Array(items) => {
                    if let Some(table) = Table::from_array(key.clone(), items) {
                        dataset.push(table);
                    }
                }
                Value::Object(record) => dataset.push(Table::from_object(key.clone(), record)),
                _ => {}
            }
        }
        dataset
    }

    /// Add a table, replacing any existing table with the same name so names
    /// stay unique within the dataset.
    pub fn push(&mut self, table: Table) {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name() == table.name()) {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn arrays_objects_and_empty_arrays_follow_their_rules() {
        let root = root(json!({
            "a": [{"x": 1}],
            "b": {"y": 2},
            "c": []
        }));
        let dataset = Dataset::from_root("Data", &root);

        assert_eq!(dataset.len(), 2);

        let a = dataset.get("a").unwrap();
        assert_eq!(a.row_count(), 1);
        assert_eq!(a.cell(0, "x"), Some(&CellValue::Integer(1)));

        let b = dataset.get("b").unwrap();
        assert_eq!(b.row_count(), 1);
        assert_eq!(b.cell(0, "y"), Some(&CellValue::Integer(2)));

        assert!(dataset.get("c").is_none());
    }

    #[test]
    fn top_level_scalars_are_dropped() {
        let root = root(json!({
            "title": "not a table",
            "count": 7,
            "flag": true,
            "nothing": null,
            "rows": [{"v": 1}]
        }));
        let dataset = Dataset::from_root("Data", &root);
        assert_eq!(dataset.len(), 1);
        assert!(dataset.get("rows").is_some());
    }

    #[test]
    fn assembly_of_an_empty_root_is_fine() {
        let dataset = Dataset::from_root("Data", &Map::new());
        assert!(dataset.is_empty());
    }

    #[test]
    fn table_order_follows_the_document() {
        let root = root(json!({
            "second": {"b": 1},
            "first": {"a": 1}
        }));
        let dataset = Dataset::from_root("Data", &root);
        let names: Vec<&str> = dataset.tables().iter().map(|t| t.name()).collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[test]
    fn push_replaces_same_named_tables() {
        let mut dataset = Dataset::new("Data");
        dataset.push(Table::from_row(
            "t",
            vec![("v".to_string(), CellValue::Integer(1))],
        ));
        dataset.push(Table::from_row(
            "t",
            vec![("v".to_string(), CellValue::Integer(2))],
        ));
        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.get("t").unwrap().cell(0, "v"),
            Some(&CellValue::Integer(2))
        );
    }
}
