//! Row filtering for [`crate::types::DataSet`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, DataResult};
use crate::types::{DataSet, Value};

/// Element-wise comparison applied between a column's cells and a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Cell equals the value.
    Eq,
    /// Cell is greater than the value.
    Gt,
    /// Cell is less than the value.
    Lt,
    /// Cell's text contains the value's text.
    Contains,
}

impl FilterOp {
    /// Wire tag (`eq`, `gt`, `lt`, `contains`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::Contains => "contains",
        }
    }
}

impl FromStr for FilterOp {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOp::Eq),
            "gt" => Ok(FilterOp::Gt),
            "lt" => Ok(FilterOp::Lt),
            "contains" => Ok(FilterOp::Contains),
            other => Err(DataError::invalid_operation(other)),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns a new [`DataSet`] containing the rows whose `column` cell satisfies `op` against
/// `value`, in original order.
///
/// - Null cells never match.
/// - `eq` between kinds that cannot be compared is simply false.
/// - `gt`/`lt` between kinds that cannot be ordered (e.g. `int` vs `str`) fail with
///   [`DataError::Validation`].
/// - `contains` matches on the text form of both sides (see [`Value`]'s `Display`).
pub fn filter_column(dataset: &DataSet, column: &str, op: FilterOp, value: &Value) -> DataResult<DataSet> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| DataError::column_not_found(column))?;

    match op {
        FilterOp::Eq => Ok(dataset.filter_rows(|row| row[idx].loose_eq(value))),
        FilterOp::Contains if value.is_null() => Ok(dataset.filter_rows(|_| false)),
        FilterOp::Contains => {
            let needle = value.to_string();
            Ok(dataset.filter_rows(|row| {
                let cell = &row[idx];
                !cell.is_null() && cell.to_string().contains(needle.as_str())
            }))
        }
        FilterOp::Gt => ordered_filter(dataset, idx, value, '>', Ordering::Greater),
        FilterOp::Lt => ordered_filter(dataset, idx, value, '<', Ordering::Less),
    }
}

fn ordered_filter(
    dataset: &DataSet,
    idx: usize,
    value: &Value,
    symbol: char,
    wanted: Ordering,
) -> DataResult<DataSet> {
    dataset.try_filter_rows(|row| match row[idx].try_cmp(value) {
        Ok(ord) => Ok(ord == Some(wanted)),
        Err(cause) => Err(DataError::validation(format!("'{symbol}' {cause}"))),
    })
}
