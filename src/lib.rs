//! `tabular-api` is a small web service exposing CRUD, filter, aggregate and statistics
//! operations over named in-memory [`types::DataSet`]s.
//!
//! The primary entrypoint for library users is [`store::DatasetStore`]; the HTTP surface in
//! [`server`] is a thin mapping from requests onto store calls.
//!
//! ## Data model
//!
//! Datasets are built from JSON row records. Columns are the union of record keys, and each
//! column's [`types::DataType`] is inferred once at creation time:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Object`] (mixed kinds, or no non-null values)
//!
//! Missing keys and explicit JSON `null` map to [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```rust
//! use serde_json::json;
//! use tabular_api::store::{DatasetStore, SAMPLE_DATASET};
//!
//! let mut store = DatasetStore::new().with_sample();
//!
//! // Filter rows.
//! let ny = store
//!     .filter(SAMPLE_DATASET, "city", "eq", &json!("New York"))
//!     .unwrap();
//! assert_eq!(ny.total_rows, 2);
//!
//! // Reduce a column.
//! let total = store.aggregate(SAMPLE_DATASET, "salary", "sum").unwrap();
//! assert_eq!(total.result, Some(387000.0));
//!
//! // Upload a dataset of your own.
//! store
//!     .create("scores", &[json!({"who": "ada", "score": 9.5}), json!({"who": "bob"})])
//!     .unwrap();
//! let page = store.get("scores", None).unwrap();
//! assert_eq!(page.total_rows, 2);
//! ```
//!
//! ## Modules
//!
//! - [`store`]: named datasets and the operation entrypoints
//! - [`ingestion`]: building datasets from JSON row records
//! - [`processing`]: filter/reduce/describe over a single dataset
//! - [`types`]: schema + in-memory dataset types
//! - [`observability`]: observer hooks reporting operation outcomes
//! - [`server`]: axum router, configuration and error mapping
//! - [`error`]: error type shared by every operation

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod server;
pub mod store;
pub mod types;

pub use error::{DataError, DataResult};
