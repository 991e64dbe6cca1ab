//! Application error types and their HTTP mappings.
//!
//! Every operation surfaces failures as a typed, message-bearing
//! `ServiceError`. The only place an error is deliberately swallowed is the
//! auth context resolver, which falls back to an anonymous context instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures produced by the service layer, keyed by how the caller can react.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input; user-correctable.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid identity, or credential mismatch.
    #[error("{0}")]
    Authentication(String),

    /// Uniqueness violation (duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Referenced resource absent, or not owned by the caller.
    #[error("{0}")]
    NotFound(String),

    /// Infrastructure failure (store unreachable, hash failure). Not
    /// recovered locally; the message never leaves the process.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Authentication(_) => "AUTHENTICATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Converts a `ServiceError` into an HTTP response.
///
/// Internal errors are logged here and replaced with an opaque message so
/// infrastructure detail never reaches the client.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServiceError::Internal(detail) => {
                error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({ "error": message, "code": self.code() });
        (self.status(), Json(body)).into_response()
    }
}

/// Failures produced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
