//! Reduction operations for [`crate::types::DataSet`].
//!
//! Numeric columns are reduced through a `polars` [`Series`]; string columns support
//! `count`/`min`/`max` only.

use std::fmt;
use std::str::FromStr;

use polars::prelude::{NamedFrom, Series};

use crate::error::{DataError, DataResult};
use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-null cells.
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean, ignoring nulls.
    Mean,
    /// Median, ignoring nulls.
    Median,
    /// Minimum value, ignoring nulls.
    Min,
    /// Maximum value, ignoring nulls.
    Max,
}

impl ReduceOp {
    /// Wire tag (`sum`, `mean`, `median`, `count`, `min`, `max`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ReduceOp::Count => "count",
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Median => "median",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
        }
    }
}

impl FromStr for ReduceOp {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(ReduceOp::Count),
            "sum" => Ok(ReduceOp::Sum),
            "mean" => Ok(ReduceOp::Mean),
            "median" => Ok(ReduceOp::Median),
            "min" => Ok(ReduceOp::Min),
            "max" => Ok(ReduceOp::Max),
            other => Err(DataError::invalid_operation(other)),
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Fails with [`DataError::ColumnNotFound`] if `column` does not exist in the schema.
/// - `Count` counts non-null cells of any type.
/// - Integer, float and boolean columns (booleans as `0`/`1`) reduce numerically. `Sum` of an
///   empty column is `0`; the other reductions return `Ok(None)` when there is nothing to reduce.
/// - `Min`/`Max` on strings pick lexicographically, then the chosen string must parse as a float.
/// - Any other combination fails with [`DataError::Validation`].
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> DataResult<Option<f64>> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| DataError::column_not_found(column))?;

    if op == ReduceOp::Count {
        let count = dataset.column_values(idx).filter(|v| !v.is_null()).count();
        return Ok(Some(count as f64));
    }

    let data_type = dataset.schema.fields[idx].data_type;
    match numeric_values(dataset, idx, data_type) {
        Some(values) => reduce_numeric(column, values, op),
        None => reduce_ordered(dataset, idx, op),
    }
}

/// Non-null cells as floats, or `None` if the column holds anything non-numeric.
pub(crate) fn numeric_values(dataset: &DataSet, idx: usize, data_type: DataType) -> Option<Vec<f64>> {
    if data_type == DataType::Utf8 {
        return None;
    }
    dataset
        .column_values(idx)
        .filter(|v| !v.is_null())
        .map(Value::as_f64)
        .collect()
}

fn reduce_numeric(column: &str, values: Vec<f64>, op: ReduceOp) -> DataResult<Option<f64>> {
    let series = Series::new(column.into(), values);
    let out = match op {
        ReduceOp::Count => Some(series.len() as f64),
        ReduceOp::Sum => Some(series.sum::<f64>()?),
        ReduceOp::Mean => series.mean(),
        ReduceOp::Median => series.median(),
        ReduceOp::Min => series.min::<f64>()?,
        ReduceOp::Max => series.max::<f64>()?,
    };
    Ok(out.filter(|v| !v.is_nan()))
}

fn reduce_ordered(dataset: &DataSet, idx: usize, op: ReduceOp) -> DataResult<Option<f64>> {
    let (wanted, symbol) = match op {
        ReduceOp::Min => (std::cmp::Ordering::Less, '<'),
        ReduceOp::Max => (std::cmp::Ordering::Greater, '>'),
        _ => {
            let field = &dataset.schema.fields[idx];
            return Err(DataError::validation(format!(
                "cannot compute {op} of column '{}' with dtype {}",
                field.name, field.data_type
            )));
        }
    };

    let mut best: Option<&Value> = None;
    for value in dataset.column_values(idx).filter(|v| !v.is_null()) {
        best = match best {
            None => Some(value),
            Some(current) => {
                let ord = value
                    .try_cmp(current)
                    .map_err(|cause| DataError::validation(format!("'{symbol}' {cause}")))?;
                if ord == Some(wanted) { Some(value) } else { Some(current) }
            }
        };
    }

    match best {
        None => Ok(None),
        Some(Value::Utf8(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| DataError::validation(format!("could not convert string to float: '{s}'"))),
        Some(other) => Ok(other.as_f64()),
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, ReduceOp};
    use crate::error::DataError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("score", DataType::Float64),
            Field::new("name", DataType::Utf8),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0), Value::Utf8("b".into())],
            vec![Value::Int64(2), Value::Null, Value::Utf8("a".into())],
            vec![Value::Int64(3), Value::Float64(5.5), Value::Null],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_count_counts_non_null_cells() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Count), Ok(Some(2.0)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Count), Ok(Some(3.0)));
        assert_eq!(reduce(&ds, "name", ReduceOp::Count), Ok(Some(2.0)));
    }

    #[test]
    fn reduce_sum_mean_median_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Sum), Ok(Some(15.5)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Sum), Ok(Some(6.0)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Mean), Ok(Some(2.0)));
        assert_eq!(reduce(&ds, "score", ReduceOp::Median), Ok(Some(7.75)));
    }

    #[test]
    fn reduce_min_max_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Min), Ok(Some(5.5)));
        assert_eq!(reduce(&ds, "score", ReduceOp::Max), Ok(Some(10.0)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Min), Ok(Some(1.0)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Max), Ok(Some(3.0)));
    }

    #[test]
    fn reduce_missing_column_is_error() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "missing", ReduceOp::Count),
            Err(DataError::ColumnNotFound {
                column: "missing".to_string()
            })
        );
    }

    #[test]
    fn reduce_all_null_column_is_absent_not_error() {
        let schema = Schema::new(vec![Field::new("score", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(reduce(&ds, "score", ReduceOp::Mean), Ok(None));
        assert_eq!(reduce(&ds, "score", ReduceOp::Median), Ok(None));
        assert_eq!(reduce(&ds, "score", ReduceOp::Min), Ok(None));
        assert_eq!(reduce(&ds, "score", ReduceOp::Sum), Ok(Some(0.0)));
    }

    #[test]
    fn reduce_strings_min_max_need_numeric_text() {
        let ds = numeric_dataset_with_nulls();
        let err = reduce(&ds, "name", ReduceOp::Min).unwrap_err();
        assert_eq!(err.to_string(), "could not convert string to float: 'a'");

        let schema = Schema::new(vec![Field::new("code", DataType::Utf8)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Utf8("7".into())], vec![Value::Utf8("12".into())]],
        );
        // "7" > "12" lexicographically.
        assert_eq!(reduce(&ds, "code", ReduceOp::Max), Ok(Some(7.0)));
    }

    #[test]
    fn reduce_sum_of_strings_is_validation_error() {
        let ds = numeric_dataset_with_nulls();
        let err = reduce(&ds, "name", ReduceOp::Sum).unwrap_err();
        assert!(matches!(err, DataError::Validation { .. }));
    }

    #[test]
    fn reduce_bool_column_counts_trues() {
        let schema = Schema::new(vec![Field::new("flag", DataType::Bool)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Bool(true)], vec![Value::Bool(false)], vec![Value::Bool(true)]],
        );
        assert_eq!(reduce(&ds, "flag", ReduceOp::Sum), Ok(Some(2.0)));
        assert_eq!(reduce(&ds, "flag", ReduceOp::Max), Ok(Some(1.0)));
    }

    #[test]
    fn reduce_mixed_object_column_min_is_validation_error() {
        let schema = Schema::new(vec![Field::new("m", DataType::Object)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Int64(1)], vec![Value::Utf8("x".into())]],
        );
        let err = reduce(&ds, "m", ReduceOp::Min).unwrap_err();
        assert!(err.to_string().contains("not supported between instances"));
    }
}
