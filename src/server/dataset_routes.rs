//! Dataset HTTP routes.
//!
//! Endpoints for dataset management, filtering, aggregation and statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::processing::DatasetStatistics;
use crate::store::{
    AggregateOutcome, CreateSummary, DatasetInfo, DatasetPage, DatasetStore, FilterOutcome,
};

use super::errors::ApiResult;

// ==================
// Shared State
// ==================

/// Dataset store shared across handlers.
///
/// `create`/`delete` take the write lock; every other handler takes the read lock.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<DatasetStore>>,
}

impl AppState {
    pub fn new(store: DatasetStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct DataUpload {
    pub name: String,
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub dataset_name: String,
    pub column: String,
    pub operation: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct AggregateRequest {
    pub dataset_name: String,
    pub column: String,
    pub operation: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Dataset Routes
// ==================

/// Create dataset routes (mounted under `/api`)
pub fn dataset_routes(state: AppState) -> Router {
    Router::new()
        .route("/datasets", get(list_datasets_handler).post(create_dataset_handler))
        .route("/datasets/:name", get(get_dataset_handler).delete(delete_dataset_handler))
        .route("/datasets/:name/stats", get(dataset_stats_handler))
        .route("/filter", post(filter_handler))
        .route("/aggregate", post(aggregate_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_datasets_handler(State(state): State<AppState>) -> Json<BTreeMap<String, DatasetInfo>> {
    let store = state.store.read().await;
    Json(store.list())
}

async fn create_dataset_handler(
    State(state): State<AppState>,
    body: Result<Json<DataUpload>, JsonRejection>,
) -> ApiResult<Json<CreateSummary>> {
    let Json(upload) = body?;
    let mut store = state.store.write().await;
    Ok(Json(store.create(&upload.name, &upload.data)?))
}

async fn get_dataset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<DatasetPage>> {
    let Query(query) = query?;
    let store = state.store.read().await;
    Ok(Json(store.get(&name, query.limit)?))
}

async fn delete_dataset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let mut store = state.store.write().await;
    let message = store.delete(&name)?;
    Ok(Json(MessageResponse { message }))
}

async fn filter_handler(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<FilterOutcome>> {
    let Json(request) = body?;
    let store = state.store.read().await;
    let outcome = store.filter(
        &request.dataset_name,
        &request.column,
        &request.operation,
        &request.value,
    )?;
    Ok(Json(outcome))
}

async fn aggregate_handler(
    State(state): State<AppState>,
    body: Result<Json<AggregateRequest>, JsonRejection>,
) -> ApiResult<Json<AggregateOutcome>> {
    let Json(request) = body?;
    let store = state.store.read().await;
    let outcome = store.aggregate(&request.dataset_name, &request.column, &request.operation)?;
    Ok(Json(outcome))
}

async fn dataset_stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DatasetStatistics>> {
    let store = state.store.read().await;
    Ok(Json(store.stats(&name)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_request_value_defaults_to_null() {
        let req: FilterRequest = serde_json::from_str(
            r#"{"dataset_name": "sample", "column": "age", "operation": "eq"}"#,
        )
        .unwrap();
        assert!(req.value.is_null());
    }

    #[test]
    fn test_router_builds() {
        let _router = dataset_routes(AppState::new(DatasetStore::new()));
    }
}
