//! HTTP error mapping
//!
//! - Validation failures: 400 `{"success": false, "message": ...}`
//! - Query execution failures: 400 `{"message": ...}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::executor::QueryExecutionError;
use crate::validation::ValidationError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Query string could not be decoded at all
    #[error("{0}")]
    MalformedQuery(String),

    #[error(transparent)]
    Execution(#[from] QueryExecutionError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedQuery(_) | ApiError::Execution(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let body = match self {
            ApiError::Validation(_) | ApiError::MalformedQuery(_) => {
                json!({ "success": false, "message": message })
            }
            ApiError::Execution(_) => json!({ "message": message }),
        };
        (status, Json(body)).into_response()
    }
}
