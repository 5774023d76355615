//! Named in-memory datasets.
//!
//! [`DatasetStore`] owns every dataset of a service instance and is the entry point for all
//! dataset operations. Each operation:
//!
//! - looks up the dataset by name ([`DataError::NotFound`] if absent)
//! - runs one ingestion/processing call
//! - reports success/failure/alerts to the configured [`StoreObserver`], if any
//!
//! The store itself is not synchronised; callers that share it across threads wrap it in a
//! lock (see [`crate::server::AppState`]).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::error::{DataError, DataResult};
use crate::ingestion::{ingest_records, scalar_from_json};
use crate::observability::{
    OperationContext, OperationKind, OperationSeverity, OperationStats, StoreObserver,
};
use crate::processing::{describe, filter_column, reduce, DatasetStatistics, FilterOp, ReduceOp};
use crate::types::{serialize_records, ColumnMap, DataSet};

/// Rows returned by [`DatasetStore::get`] when the caller gives no limit.
pub const DEFAULT_ROW_LIMIT: i64 = 100;

/// Name of the dataset seeded by [`DatasetStore::with_sample`].
pub const SAMPLE_DATASET: &str = "sample";

/// Records of the seeded `sample` dataset.
pub fn sample_records() -> Vec<serde_json::Value> {
    vec![
        json!({"id": 1, "name": "Alice", "age": 30, "city": "New York", "salary": 75000}),
        json!({"id": 2, "name": "Bob", "age": 25, "city": "San Francisco", "salary": 85000}),
        json!({"id": 3, "name": "Charlie", "age": 35, "city": "Los Angeles", "salary": 65000}),
        json!({"id": 4, "name": "Diana", "age": 28, "city": "New York", "salary": 90000}),
        json!({"id": 5, "name": "Eve", "age": 32, "city": "Chicago", "salary": 72000}),
    ]
}

/// Listing entry for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: Vec<String>,
    pub shape: (usize, usize),
}

/// Result of [`DatasetStore::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSummary {
    pub message: String,
    pub shape: (usize, usize),
    pub columns: Vec<String>,
}

/// Result of [`DatasetStore::get`]: the first rows of a dataset plus its shape and types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPage {
    #[serde(serialize_with = "serialize_records")]
    pub data: DataSet,
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub dtypes: ColumnMap<&'static str>,
}

/// Result of [`DatasetStore::filter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    #[serde(serialize_with = "serialize_records")]
    pub data: DataSet,
    pub total_rows: usize,
}

/// Result of [`DatasetStore::aggregate`]. `result` is `None` when the reduction is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateOutcome {
    pub column: String,
    pub operation: String,
    pub result: Option<f64>,
}

/// Options controlling store reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct StoreOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn StoreObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: OperationSeverity,
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: OperationSeverity::Critical,
        }
    }
}

/// Registry of datasets by name. Listings are ordered by name.
#[derive(Debug, Default)]
pub struct DatasetStore {
    datasets: BTreeMap<String, DataSet>,
    options: StoreOptions,
}

impl DatasetStore {
    /// Create an empty store without an observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            datasets: BTreeMap::new(),
            options,
        }
    }

    /// Add the `sample` dataset (5 employee records) to the store.
    pub fn with_sample(self) -> Self {
        self.seeded(SAMPLE_DATASET, &sample_records())
    }

    fn seeded(mut self, name: &str, records: &[serde_json::Value]) -> Self {
        match ingest_records(records) {
            Ok(dataset) => {
                self.insert(name, dataset);
            }
            Err(e) => warn!(dataset = name, err = %e, "skipping seed dataset"),
        }
        self
    }

    /// Number of stored datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// `true` if no dataset is stored.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Borrow a dataset by name.
    pub fn dataset(&self, name: &str) -> Option<&DataSet> {
        self.datasets.get(name)
    }

    /// Row count, columns and shape of every dataset.
    pub fn list(&self) -> BTreeMap<String, DatasetInfo> {
        let out: BTreeMap<String, DatasetInfo> = self
            .datasets
            .iter()
            .map(|(name, ds)| {
                let info = DatasetInfo {
                    rows: ds.row_count(),
                    columns: ds.column_names(),
                    shape: ds.shape(),
                };
                (name.clone(), info)
            })
            .collect();
        self.report_success(OperationKind::List, "", out.len());
        out
    }

    /// Build a dataset from row records and store it under `name`, replacing any dataset of
    /// the same name.
    pub fn create(&mut self, name: &str, records: &[serde_json::Value]) -> DataResult<CreateSummary> {
        let result = ingest_records(records).map(|ds| self.insert(name, ds));
        self.report(OperationKind::Create, name, result, |s| s.shape.0)
    }

    /// Store an already-built dataset under `name`, replacing any dataset of the same name.
    pub fn insert(&mut self, name: &str, dataset: DataSet) -> CreateSummary {
        let summary = CreateSummary {
            message: format!("Dataset '{name}' created successfully"),
            shape: dataset.shape(),
            columns: dataset.column_names(),
        };
        self.datasets.insert(name.to_string(), dataset);
        summary
    }

    /// First rows of a dataset.
    ///
    /// `limit` defaults to [`DEFAULT_ROW_LIMIT`]. `Some(0)` returns every row; a negative limit
    /// `-n` returns all rows except the last `n`.
    pub fn get(&self, name: &str, limit: Option<i64>) -> DataResult<DatasetPage> {
        let result = self.lookup(name).map(|ds| {
            let limit = limit.unwrap_or(DEFAULT_ROW_LIMIT);
            let data = if limit == 0 { ds.clone() } else { ds.head(limit) };
            DatasetPage {
                data,
                columns: ds.column_names(),
                total_rows: ds.row_count(),
                dtypes: ds.dtypes(),
            }
        });
        self.report(OperationKind::Get, name, result, |p| p.data.row_count())
    }

    /// Remove a dataset.
    pub fn delete(&mut self, name: &str) -> DataResult<String> {
        let result = match self.datasets.remove(name) {
            Some(_) => Ok(format!("Dataset '{name}' deleted successfully")),
            None => Err(DataError::not_found(name)),
        };
        self.report(OperationKind::Delete, name, result, |_| 0)
    }

    /// Rows of `name` whose `column` satisfies `operation` (`eq`/`gt`/`lt`/`contains`)
    /// against `value`. The stored dataset is not modified.
    pub fn filter(
        &self,
        name: &str,
        column: &str,
        operation: &str,
        value: &serde_json::Value,
    ) -> DataResult<FilterOutcome> {
        let result = self.lookup(name).and_then(|ds| {
            require_column(ds, column)?;
            let op: FilterOp = operation.parse()?;
            let value = scalar_from_json(value)?;
            let data = filter_column(ds, column, op, &value)?;
            Ok(FilterOutcome {
                total_rows: data.row_count(),
                data,
            })
        });
        self.report(OperationKind::Filter, name, result, |f| f.total_rows)
    }

    /// Reduce `column` of `name` with `operation` (`sum`/`mean`/`median`/`count`/`min`/`max`).
    pub fn aggregate(&self, name: &str, column: &str, operation: &str) -> DataResult<AggregateOutcome> {
        let result = self.lookup(name).and_then(|ds| {
            require_column(ds, column)?;
            let op: ReduceOp = operation.parse()?;
            Ok(AggregateOutcome {
                column: column.to_string(),
                operation: operation.to_string(),
                result: reduce(ds, column, op)?,
            })
        });
        self.report(OperationKind::Aggregate, name, result, |_| 1)
    }

    /// Descriptive statistics and null counts for every column of `name`.
    pub fn stats(&self, name: &str) -> DataResult<DatasetStatistics> {
        let result = self.lookup(name).map(describe);
        self.report(OperationKind::Stats, name, result, |s| s.statistics.len())
    }

    fn lookup(&self, name: &str) -> DataResult<&DataSet> {
        self.datasets.get(name).ok_or_else(|| DataError::not_found(name))
    }

    fn report<T>(
        &self,
        operation: OperationKind,
        dataset: &str,
        result: DataResult<T>,
        rows: impl FnOnce(&T) -> usize,
    ) -> DataResult<T> {
        if let Some(obs) = self.options.observer.as_ref() {
            let ctx = OperationContext {
                operation,
                dataset: dataset.to_string(),
            };
            match &result {
                Ok(value) => obs.on_success(&ctx, OperationStats { rows: rows(value) }),
                Err(e) => {
                    let sev = OperationSeverity::for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }
        result
    }

    fn report_success(&self, operation: OperationKind, dataset: &str, rows: usize) {
        if let Some(obs) = self.options.observer.as_ref() {
            let ctx = OperationContext {
                operation,
                dataset: dataset.to_string(),
            };
            obs.on_success(&ctx, OperationStats { rows });
        }
    }
}

fn require_column(dataset: &DataSet, column: &str) -> DataResult<()> {
    match dataset.schema.index_of(column) {
        Some(_) => Ok(()),
        None => Err(DataError::column_not_found(column)),
    }
}
