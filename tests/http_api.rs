use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tabular_api::server::{AppState, HttpServer, ServerConfig};
use tabular_api::store::DatasetStore;

fn app() -> Router {
    HttpServer::new(
        ServerConfig::default(),
        AppState::new(DatasetStore::new().with_sample()),
    )
    .router()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn root_reports_service_name_and_version() {
    let (status, body) = send(app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Tabular Data API", "version": "1.0.0"}));
}

#[tokio::test]
async fn list_contains_seeded_sample() {
    let (status, body) = send(app(), Method::GET, "/api/datasets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sample"]["rows"], json!(5));
    assert_eq!(body["sample"]["shape"], json!([5, 5]));
}

#[tokio::test]
async fn get_sample_with_limit() {
    let (status, body) = send(app(), Method::GET, "/api/datasets/sample?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], json!(5));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["data"][0],
        json!({"id": 1, "name": "Alice", "age": 30, "city": "New York", "salary": 75000})
    );

    let keys: Vec<&String> = body["data"][0].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["id", "name", "age", "city", "salary"]);
}

#[tokio::test]
async fn get_with_malformed_limit_is_bad_request() {
    let (status, body) = send(app(), Method::GET, "/api/datasets/sample?limit=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn unknown_dataset_is_not_found() {
    let (status, body) = send(app(), Method::GET, "/api/datasets/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Dataset not found"}));
}

#[tokio::test]
async fn create_then_get_then_delete() {
    let app = app();
    let upload = json!({
        "name": "pets",
        "data": [
            {"kind": "cat", "legs": 4},
            {"kind": "bird", "legs": 2}
        ]
    });

    let (status, body) = send(app.clone(), Method::POST, "/api/datasets", Some(upload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Dataset 'pets' created successfully",
            "shape": [2, 2],
            "columns": ["kind", "legs"]
        })
    );

    let (status, body) = send(app.clone(), Method::GET, "/api/datasets/pets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{"kind": "cat", "legs": 4}, {"kind": "bird", "legs": 2}]));
    assert_eq!(body["dtypes"], json!({"kind": "object", "legs": "int64"}));

    let (status, body) = send(app.clone(), Method::DELETE, "/api/datasets/pets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Dataset 'pets' deleted successfully"}));

    let (status, _) = send(app, Method::GET, "/api/datasets/pets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_dataset_is_not_found() {
    let (status, body) = send(app(), Method::DELETE, "/api/datasets/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], json!("Dataset not found"));
}

#[tokio::test]
async fn create_with_malformed_body_is_bad_request() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/datasets",
        Some(json!({"name": "broken"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn filter_by_city() {
    let request = json!({
        "dataset_name": "sample",
        "column": "city",
        "operation": "eq",
        "value": "New York"
    });
    let (status, body) = send(app(), Method::POST, "/api/filter", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], json!(2));
    assert_eq!(body["data"][0]["name"], json!("Alice"));
    assert_eq!(body["data"][1]["name"], json!("Diana"));
}

#[tokio::test]
async fn filter_errors_map_to_status_codes() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/filter",
        Some(json!({"dataset_name": "nope", "column": "age", "operation": "eq", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], json!("Dataset not found"));

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/filter",
        Some(json!({"dataset_name": "sample", "column": "height", "operation": "eq", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("Column 'height' not found"));

    let (status, body) = send(
        app,
        Method::POST,
        "/api/filter",
        Some(json!({"dataset_name": "sample", "column": "age", "operation": "between", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("Invalid operation: 'between'"));
}

#[tokio::test]
async fn aggregate_salary_sum() {
    let request = json!({"dataset_name": "sample", "column": "salary", "operation": "sum"});
    let (status, body) = send(app(), Method::POST, "/api/aggregate", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"column": "salary", "operation": "sum", "result": 387000.0})
    );
}

#[tokio::test]
async fn aggregate_invalid_operation_is_bad_request() {
    let request = json!({"dataset_name": "sample", "column": "salary", "operation": "mode"});
    let (status, body) = send(app(), Method::POST, "/api/aggregate", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("Invalid operation: 'mode'"));
}

#[tokio::test]
async fn stats_for_sample() {
    let (status, body) = send(app(), Method::GET, "/api/datasets/sample/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["age"]["count"], json!(5.0));
    assert_eq!(body["statistics"]["age"]["min"], json!(25.0));
    assert_eq!(body["statistics"]["age"]["max"], json!(35.0));
    assert_eq!(body["null_counts"]["city"], json!(0));
}

#[tokio::test]
async fn stats_for_unknown_dataset_is_not_found() {
    let (status, _) = send(app(), Method::GET, "/api/datasets/nope/stats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn allowed_origin(app: Router, origin: &str) -> Option<String> {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header("origin", origin)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let origin = allowed_origin(app(), "http://example.com").await;
    assert_eq!(origin.as_deref(), Some("*"));
}

#[tokio::test]
async fn cors_echoes_only_configured_origins() {
    let config = ServerConfig {
        cors_origins: vec!["http://localhost:5173".to_string()],
        ..Default::default()
    };
    let app = HttpServer::new(config, AppState::new(DatasetStore::new())).router();

    let origin = allowed_origin(app.clone(), "http://localhost:5173").await;
    assert_eq!(origin.as_deref(), Some("http://localhost:5173"));

    let origin = allowed_origin(app, "http://example.com").await;
    assert_eq!(origin, None);
}
