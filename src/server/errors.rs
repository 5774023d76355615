//! Mapping of [`DataError`] onto HTTP responses.
//!
//! Error bodies are `{"detail": "<message>"}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::DataError;

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, DataError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl DataError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DataError::NotFound { .. } => StatusCode::NOT_FOUND,
            DataError::ColumnNotFound { .. }
            | DataError::InvalidOperation { .. }
            | DataError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for DataError {
    fn from(rejection: JsonRejection) -> Self {
        DataError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for DataError {
    fn from(rejection: QueryRejection) -> Self {
        DataError::validation(rejection.body_text())
    }
}
