//! API error type for keepsake-web
//!
//! Every handler failure is converted to a JSON error response at the
//! boundary of the action that triggered it; nothing is retried and nothing
//! crashes the serving loop.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Record id already exists (409)
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Local object store inaccessible (503)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Song database inaccessible (502)
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<keepsake_common::Error> for ApiError {
    fn from(err: keepsake_common::Error) -> Self {
        use keepsake_common::Error;
        match err {
            Error::DuplicateKey(id) => ApiError::DuplicateKey(id),
            Error::NotFound(what) => ApiError::NotFound(what),
            Error::StoreUnavailable(msg) => ApiError::StoreUnavailable(msg),
            Error::ValidationFailed(msg) => ApiError::BadRequest(msg),
            Error::RemoteUnavailable(msg) => ApiError::RemoteUnavailable(msg),
            Error::Database(e) => ApiError::Internal(e.to_string()),
            Error::Io(e) => ApiError::Io(e),
            Error::Config(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", msg),
            ApiError::DuplicateKey(msg) => (StatusCode::CONFLICT, "DUPLICATE_KEY", msg),
            ApiError::StoreUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", msg)
            }
            ApiError::RemoteUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "REMOTE_UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
