//! HTTP server combining the dataset routes with CORS, tracing and body-size layers.

use std::future::Future;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::ServerConfig;
use super::dataset_routes::{dataset_routes, AppState};

/// HTTP server for the dataset API.
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an existing store state.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/", get(root_handler))
            .nest("/api", dataset_routes(state))
            .layer(DefaultBodyLimit::max(config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(addr = %listener.local_addr()?, "tabular API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({"message": "Tabular Data API", "version": "1.0.0"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DatasetStore;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(ServerConfig::default(), AppState::default());
        assert_eq!(server.socket_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string(), "not a url\n".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, AppState::new(DatasetStore::new())).router();
    }
}
