//! Row-record ingestion.
//!
//! Builds a [`DataSet`] from a list of JSON objects (`[{"a":1}, {"a":2,"b":"x"}]`):
//!
//! - Columns are the union of keys across all records, in order of first appearance.
//! - A key missing from a record becomes [`Value::Null`] in that row.
//! - Each column's [`DataType`] is inferred once from its non-null cells.
//! - Nested arrays/objects are rejected.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Number};

use crate::error::{DataError, DataResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Ingest a JSON file holding an array of objects.
pub fn ingest_records_from_path(path: impl AsRef<Path>) -> DataResult<DataSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| DataError::validation(format!("cannot read {}: {e}", path.display())))?;
    ingest_records_from_str(&text)
}

/// Ingest a JSON array of objects from an in-memory string.
pub fn ingest_records_from_str(input: &str) -> DataResult<DataSet> {
    let v: serde_json::Value = serde_json::from_str(input.trim())
        .map_err(|e| DataError::validation(format!("invalid json: {e}")))?;
    match v {
        serde_json::Value::Array(items) => ingest_records(&items),
        _ => Err(DataError::validation("json must be an array of objects")),
    }
}

/// Build a dataset from already-parsed row records.
pub fn ingest_records(records: &[serde_json::Value]) -> DataResult<DataSet> {
    let mut objects: Vec<&Map<String, serde_json::Value>> = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (idx0, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or_else(|| {
            DataError::validation(format!("row {} is not a json object", idx0 + 1))
        })?;
        for key in obj.keys() {
            if !seen.contains_key(key.as_str()) {
                seen.insert(key.as_str(), columns.len());
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut fields = Vec::with_capacity(columns.len());
    let mut column_cells: Vec<Vec<Value>> = Vec::with_capacity(columns.len());
    for name in &columns {
        let mut cells = Vec::with_capacity(objects.len());
        for (idx0, obj) in objects.iter().enumerate() {
            let cell = match obj.get(name) {
                Some(jv) => scalar_from_json(jv).map_err(|_| {
                    DataError::validation(format!(
                        "row {} column '{name}': nested values are not supported (raw='{jv}')",
                        idx0 + 1
                    ))
                })?,
                None => Value::Null,
            };
            cells.push(cell);
        }
        let data_type = infer_data_type(&cells);
        if data_type == DataType::Float64 {
            widen_to_float(&mut cells);
        }
        fields.push(Field::new(name.clone(), data_type));
        column_cells.push(cells);
    }

    let mut rows: Vec<Vec<Value>> = (0..objects.len())
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for cells in column_cells {
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Convert a JSON scalar into a [`Value`].
///
/// Integers that fit in `i64` stay integral; every other number becomes a float.
/// Arrays and objects are rejected.
pub fn scalar_from_json(v: &serde_json::Value) -> DataResult<Value> {
    match v {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::Utf8(s.clone())),
        serde_json::Value::Number(n) => Ok(number_to_value(n)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(DataError::validation(
            format!("expected a scalar value, got '{v}'"),
        )),
    }
}

fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int64(i),
        None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Infer a column type from its cells, ignoring nulls.
pub fn infer_data_type(cells: &[Value]) -> DataType {
    let mut inferred: Option<DataType> = None;
    for cell in cells {
        let kind = match cell {
            Value::Null => continue,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Bool(_) => DataType::Bool,
            Value::Utf8(_) => DataType::Utf8,
        };
        inferred = Some(match (inferred, kind) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            _ => return DataType::Object,
        });
    }
    inferred.unwrap_or(DataType::Object)
}

fn widen_to_float(cells: &mut [Value]) {
    for cell in cells {
        if let Value::Int64(v) = cell {
            *cell = Value::Float64(*v as f64);
        }
    }
}
