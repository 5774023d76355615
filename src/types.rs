//! Core data model types.
//!
//! A dataset is an in-memory [`DataSet`]: a [`Schema`] (an ordered list of typed [`Field`]s)
//! plus row-major storage of typed [`Value`]s. Column types are inferred once, when the
//! dataset is built from row records (see [`crate::ingestion::records`]).

use std::cmp::Ordering;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Mixed kinds, or a column with no non-null values.
    Object,
}

impl DataType {
    /// Type tag reported to clients (`int64`, `float64`, `bool`, `object`).
    pub fn dtype_name(&self) -> &'static str {
        match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
            DataType::Utf8 | DataType::Object => "object",
        }
    }

    /// Whether descriptive statistics treat this column as numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype_name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the columns of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Booleans count as `0`/`1`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Null | Value::Utf8(_) => None,
        }
    }

    /// Short kind name used in comparison error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NoneType",
            Value::Int64(_) => "int",
            Value::Float64(_) => "float",
            Value::Bool(_) => "bool",
            Value::Utf8(_) => "str",
        }
    }

    /// Orders two values of compatible kinds.
    ///
    /// - `Ok(None)` if either side is null (nulls never compare).
    /// - numbers and booleans compare numerically, strings lexicographically.
    /// - `Err` names both kinds when they cannot be ordered against each other.
    pub fn try_cmp(&self, other: &Value) -> Result<Option<Ordering>, String> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => Ok(None),
            (Value::Utf8(a), Value::Utf8(b)) => Ok(Some(a.cmp(b))),
            (Value::Int64(a), Value::Int64(b)) => Ok(Some(a.cmp(b))),
            (Value::Utf8(_), _) | (_, Value::Utf8(_)) => Err(format!(
                "not supported between instances of '{}' and '{}'",
                self.kind_name(),
                other.kind_name()
            )),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
                _ => Ok(None),
            },
        }
    }

    /// Equality across kinds: numbers/booleans numerically, strings exactly, nulls never.
    pub fn loose_eq(&self, other: &Value) -> bool {
        matches!(self.try_cmp(other), Ok(Some(Ordering::Equal)))
    }

    /// Convert to a JSON value for transport. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int64(v) => serde_json::Value::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Utf8(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Display mirrors the textual form used by substring filtering: booleans as `True`/`False`,
/// integral floats keep a trailing `.0`, nulls as `None`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => {
                if v.is_nan() {
                    f.write_str("nan")
                } else if v.is_infinite() {
                    f.write_str(if *v > 0.0 { "inf" } else { "-inf" })
                } else if v.fract() == 0.0 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    ///
    /// # Panics
    ///
    /// Panics if a row's length differs from the schema field count.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let expected_len = schema.len();
        for row in &rows {
            assert!(
                row.len() == expected_len,
                "row length {} does not match schema length {}",
                row.len(),
                expected_len
            );
        }
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.schema.len())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_string).collect()
    }

    /// Iterate one column's cells top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Like [`Self::filter_rows`], but the predicate may fail; the first error aborts the scan.
    pub fn try_filter_rows<F, E>(&self, mut predicate: F) -> Result<Self, E>
    where
        F: FnMut(&[Value]) -> Result<bool, E>,
    {
        let mut rows = Vec::new();
        for row in &self.rows {
            if predicate(row.as_slice())? {
                rows.push(row.clone());
            }
        }
        Ok(Self {
            schema: self.schema.clone(),
            rows,
        })
    }

    /// First `n` rows. Negative `n` keeps all rows except the last `|n|`.
    pub fn head(&self, n: i64) -> Self {
        let len = self.rows.len();
        let take = if n >= 0 {
            (n as usize).min(len)
        } else {
            len.saturating_sub(n.unsigned_abs() as usize)
        };
        Self {
            schema: self.schema.clone(),
            rows: self.rows[..take].to_vec(),
        }
    }

    /// Type tag per column, in column order.
    pub fn dtypes(&self) -> ColumnMap<&'static str> {
        ColumnMap::new(
            self.schema
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.data_type.dtype_name()))
                .collect(),
        )
    }

    /// Rows as records keyed by column name, in column order.
    pub fn to_records(&self) -> Vec<Record<'_>> {
        self.rows
            .iter()
            .map(|row| Record {
                schema: &self.schema,
                row,
            })
            .collect()
    }
}

/// Serialize a dataset as a sequence of row records (for `#[serde(serialize_with)]`).
pub fn serialize_records<S: Serializer>(dataset: &DataSet, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(dataset.to_records())
}

/// A borrowed row that serializes as a `{column: value}` map in column order.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    schema: &'a Schema,
    row: &'a [Value],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (field, value) in self.schema.fields.iter().zip(self.row) {
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

/// Per-column values that serialize as a `{column: value}` map, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> ColumnMap<T> {
    /// Build from `(column, value)` pairs already in column order.
    pub fn new(entries: Vec<(String, T)>) -> Self {
        Self { entries }
    }

    /// Value for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for ColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Utf8("Ada".into()), Value::Float64(9.5)],
                vec![Value::Int64(2), Value::Utf8("Grace".into()), Value::Null],
                vec![Value::Int64(3), Value::Utf8("Linus".into()), Value::Float64(7.0)],
            ],
        )
    }

    #[test]
    fn head_handles_positive_zero_and_negative() {
        let ds = people();
        assert_eq!(ds.head(2).row_count(), 2);
        assert_eq!(ds.head(10).row_count(), 3);
        assert_eq!(ds.head(0).row_count(), 0);
        assert_eq!(ds.head(-1).rows, ds.rows[..2].to_vec());
        assert_eq!(ds.head(-5).row_count(), 0);
    }

    #[test]
    fn records_serialize_in_column_order() {
        let ds = people();
        let json = serde_json::to_string(&ds.to_records()[1]).unwrap();
        assert_eq!(json, r#"{"id":2,"name":"Grace","score":null}"#);
    }

    #[test]
    fn display_uses_python_like_text() {
        assert_eq!(Value::Float64(75000.0).to_string(), "75000.0");
        assert_eq!(Value::Float64(1.25).to_string(), "1.25");
        assert_eq!(Value::Float64(1e16).to_string(), "10000000000000000.0");
        assert_eq!(Value::Float64(-1e20).to_string(), "-100000000000000000000.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int64(-4).to_string(), "-4");
    }

    #[test]
    fn try_cmp_mixes_numbers_but_rejects_strings() {
        assert_eq!(
            Value::Int64(2).try_cmp(&Value::Float64(1.5)),
            Ok(Some(Ordering::Greater))
        );
        assert_eq!(Value::Null.try_cmp(&Value::Int64(1)), Ok(None));
        let err = Value::Int64(1).try_cmp(&Value::Utf8("a".into())).unwrap_err();
        assert!(err.contains("'int' and 'str'"));
        assert!(Value::Bool(true).loose_eq(&Value::Int64(1)));
        assert!(!Value::Utf8("1".into()).loose_eq(&Value::Int64(1)));
    }

    #[test]
    #[should_panic(expected = "row length")]
    fn new_rejects_ragged_rows() {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64)]);
        let _ = DataSet::new(schema, vec![vec![Value::Int64(1), Value::Int64(2)]]);
    }

    #[test]
    fn dtype_names_follow_pandas() {
        assert_eq!(DataType::Int64.dtype_name(), "int64");
        assert_eq!(DataType::Utf8.dtype_name(), "object");
        assert_eq!(DataType::Object.to_string(), "object");
    }
}
