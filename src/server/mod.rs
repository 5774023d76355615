//! HTTP/JSON surface over a [`crate::store::DatasetStore`].
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/api/datasets` | | `{name: {rows, columns, shape}}` |
//! | POST | `/api/datasets` | `{name, data}` | `{message, shape, columns}` |
//! | GET | `/api/datasets/{name}?limit=100` | | `{data, columns, total_rows, dtypes}` |
//! | DELETE | `/api/datasets/{name}` | | `{message}` |
//! | POST | `/api/filter` | `{dataset_name, column, operation, value}` | `{data, total_rows}` |
//! | POST | `/api/aggregate` | `{dataset_name, column, operation}` | `{column, operation, result}` |
//! | GET | `/api/datasets/{name}/stats` | | `{statistics, null_counts}` |
//!
//! Unknown datasets answer `404`; every other error answers `400`. Error bodies are
//! `{"detail": "<message>"}`.

pub mod config;
pub mod dataset_routes;
pub mod errors;
#[allow(clippy::module_inception)]
pub mod server;

pub use config::ServerConfig;
pub use dataset_routes::{dataset_routes, AppState};
pub use errors::{ApiResult, ErrorResponse};
pub use server::HttpServer;
