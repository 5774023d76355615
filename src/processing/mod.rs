//! In-memory dataset operations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values built by ingestion. Every
//! operation is read-only: it returns a new dataset or a scalar and leaves its input untouched.
//!
//! Currently implemented:
//!
//! - [`filter_column()`]: element-wise `eq`/`gt`/`lt`/`contains` row filtering
//! - [`reduce()`]: column reductions (count/sum/mean/median/min/max)
//! - [`describe()`]: per-column descriptive statistics and null counts
//!
//! ## Example: filter → reduce
//!
//! ```rust
//! use tabular_api::processing::{filter_column, reduce, FilterOp, ReduceOp};
//! use tabular_api::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Int64),
//!     Field::new("active", DataType::Bool),
//!     Field::new("score", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Bool(true), Value::Float64(10.0)],
//!         vec![Value::Int64(2), Value::Bool(false), Value::Float64(20.0)],
//!         vec![Value::Int64(3), Value::Bool(true), Value::Null],
//!     ],
//! );
//!
//! // Keep only active rows.
//! let active = filter_column(&ds, "active", FilterOp::Eq, &Value::Bool(true)).unwrap();
//!
//! // Sum scores (nulls ignored).
//! let sum = reduce(&active, "score", ReduceOp::Sum).unwrap();
//! assert_eq!(sum, Some(10.0));
//! ```

pub mod filter;
pub mod reduce;
pub mod stats;

pub use filter::{filter_column, FilterOp};
pub use reduce::{reduce, ReduceOp};
pub use stats::{describe, CategoricalSummary, ColumnSummary, DatasetStatistics, NumericSummary};
