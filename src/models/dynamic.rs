//! Records loaded from JSON files

use anyhow::{anyhow, bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::grid::{Column, ColumnWidth, Columns, GridError, Record, Value};

/// A dynamically typed record keyed by field name.
pub type DynamicRecord = BTreeMap<String, Value>;

/// Parse a JSON array of objects into records.
pub fn parse_records(content: &str) -> Result<Vec<DynamicRecord>> {
    let json: serde_json::Value =
        serde_json::from_str(content).context("Data file is not valid JSON")?;

    let serde_json::Value::Array(items) = json else {
        bail!("Data file must contain a JSON array of objects");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            other => Err(anyhow!("Element {} is not an object: {}", i, other)),
        })
        .collect()
}

/// Load records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<DynamicRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    let records = parse_records(&content)
        .with_context(|| format!("Failed to parse data file {}", path.display()))?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// One sortable, filterable column per field seen in any record.
///
/// Columns whose values are all numeric are right aligned.
pub fn infer_columns(records: &[DynamicRecord]) -> Result<Columns<DynamicRecord>, GridError> {
    let mut keys: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }

    let columns = keys
        .into_iter()
        .filter(|key| !key.is_empty())
        .map(|key| {
            let mut column = Column::new(key, &label_for(key))
                .sortable()
                .filterable()
                .with_width(ColumnWidth::Min(key.chars().count().max(6) as u16 + 2));
            if is_numeric_column(records, key) {
                column = column.align_right();
            }
            column
        })
        .collect();

    Columns::new(columns)
}

fn is_numeric_column(records: &[DynamicRecord], key: &str) -> bool {
    let mut any = false;
    for record in records {
        match record.field(key) {
            Value::Null => {}
            value if value.as_number().is_some() => any = true,
            _ => return false,
        }
    }
    any
}

/// `estimated_value` -> `Estimated value`
pub fn label_for(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_objects() {
        let records =
            parse_records(r#"[{"name":"Bob","cost":"12"},{"name":"Alice","cost":3.5}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].field("cost"), Value::Number(3.5));
    }

    #[test]
    fn rejects_non_arrays_and_scalars() {
        assert!(parse_records(r#"{"name":"Bob"}"#).is_err());
        assert!(parse_records(r#"[{"name":"Bob"}, 3]"#).is_err());
        assert!(parse_records("not json").is_err());
    }

    #[test]
    fn infers_columns_in_first_seen_order() {
        let records =
            parse_records(r#"[{"name":"Bob","cost":"12"},{"name":"Al","email":"a@x.com"}]"#)
                .unwrap();
        let columns = infer_columns(&records).unwrap();
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["cost", "name", "email"]);
        assert!(columns.get("cost").unwrap().align_right);
        assert!(!columns.get("name").unwrap().align_right);
        assert!(columns.is_sortable("email") && columns.is_filterable("email"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        std::fs::write(&path, r#"[{"name":"Bob"}]"#).unwrap();
        let records = load_records(&path).unwrap();
        assert_eq!(records[0].field("name"), Value::from("Bob"));
        assert!(load_records(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn labels_from_keys() {
        assert_eq!(label_for("estimated_value"), "Estimated value");
        assert_eq!(label_for("email"), "Email");
    }
}
