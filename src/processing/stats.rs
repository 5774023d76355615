//! Descriptive statistics for [`crate::types::DataSet`].
//!
//! [`describe`] summarises every column according to its [`crate::types::DataType`]:
//!
//! - numeric (`int64`/`float64`): count, mean, sample std, min, quartiles, max
//! - everything else: count, unique, top (most frequent value), freq
//!
//! Undefined fields (e.g. `std` of a single value) are left out of the summary. Columns are
//! summarised in parallel with `rayon`.

use std::collections::HashMap;

use polars::prelude::{NamedFrom, QuantileMethod, Series};
use rayon::prelude::*;
use serde::Serialize;

use crate::types::{ColumnMap, DataSet, Value};

use super::reduce::numeric_values;

/// Summary of a numeric column. All fields are floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(rename = "25%", skip_serializing_if = "Option::is_none")]
    pub p25: Option<f64>,
    #[serde(rename = "50%", skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(rename = "75%", skip_serializing_if = "Option::is_none")]
    pub p75: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Summary of a non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq: Option<usize>,
}

/// Per-column summary, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Statistics for a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatistics {
    /// Summary per column, in column order.
    pub statistics: ColumnMap<ColumnSummary>,
    /// Null cells per column, in column order.
    pub null_counts: ColumnMap<usize>,
}

/// Summarise every column of `dataset`.
pub fn describe(dataset: &DataSet) -> DatasetStatistics {
    let per_column: Vec<(String, ColumnSummary, usize)> = dataset
        .schema
        .fields
        .par_iter()
        .enumerate()
        .map(|(idx, field)| {
            let nulls = dataset.column_values(idx).filter(|v| v.is_null()).count();
            let summary = if field.data_type.is_numeric() {
                let values = numeric_values(dataset, idx, field.data_type).unwrap_or_default();
                ColumnSummary::Numeric(summarise_numeric(&field.name, values))
            } else {
                ColumnSummary::Categorical(summarise_categorical(dataset, idx))
            };
            (field.name.clone(), summary, nulls)
        })
        .collect();

    let mut statistics = Vec::with_capacity(per_column.len());
    let mut null_counts = Vec::with_capacity(per_column.len());
    for (name, summary, nulls) in per_column {
        null_counts.push((name.clone(), nulls));
        statistics.push((name, summary));
    }

    DatasetStatistics {
        statistics: ColumnMap::new(statistics),
        null_counts: ColumnMap::new(null_counts),
    }
}

fn summarise_numeric(name: &str, values: Vec<f64>) -> NumericSummary {
    let count = values.len() as f64;
    let series = Series::new(name.into(), values);
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let quantile = |q: f64| {
        let scalar = series.quantile_reduce(q, QuantileMethod::Linear).ok()?;
        finite(scalar.value().extract::<f64>())
    };

    NumericSummary {
        count,
        mean: finite(series.mean()),
        std: finite(series.std(1)),
        min: finite(series.min::<f64>().ok().flatten()),
        p25: quantile(0.25),
        p50: quantile(0.5),
        p75: quantile(0.75),
        max: finite(series.max::<f64>().ok().flatten()),
    }
}

/// Hashable identity of a cell. Numbers and booleans that compare equal share a key, so
/// `1`, `1.0` and `true` count as one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    Int(i64),
    Float(u64),
    Str(String),
}

impl ValueKey {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Int64(v) => Some(Self::Int(*v)),
            Value::Bool(v) => Some(Self::Int(i64::from(*v))),
            Value::Float64(v) => Some(Self::of_float(*v)),
            Value::Utf8(s) => Some(Self::Str(s.clone())),
        }
    }

    fn of_float(v: f64) -> Self {
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Self::Int(v as i64)
        } else {
            Self::Float(v.to_bits())
        }
    }
}

fn summarise_categorical(dataset: &DataSet, idx: usize) -> CategoricalSummary {
    // key -> (first row seen, occurrences)
    let mut counts: HashMap<ValueKey, (usize, usize)> = HashMap::new();
    let mut firsts: Vec<&Value> = Vec::new();
    let mut count = 0;

    for value in dataset.column_values(idx) {
        let Some(key) = ValueKey::of(value) else {
            continue;
        };
        count += 1;
        let next = firsts.len();
        let entry = counts.entry(key).or_insert_with(|| {
            firsts.push(value);
            (next, 0)
        });
        entry.1 += 1;
    }

    let top = counts
        .values()
        .copied()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));

    CategoricalSummary {
        count,
        unique: counts.len(),
        top: top.map(|(first, _)| firsts[first].clone()),
        freq: top.map(|(_, freq)| freq),
    }
}
