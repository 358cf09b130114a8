//! Error response implementation.

use super::types::ApiError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{error, warn};

/// Error response body, `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Build a JSON error response with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

/// Panic handler for `CatchPanicLayer`: the payload is logged, never returned.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Handler panicked");
    ApiError::Internal(anyhow::anyhow!("handler panicked")).into_response_quiet()
}

impl ApiError {
    fn into_response_quiet(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(err) => {
                error!(error = ?err, code = self.error_code(), "Server error occurred");
            }
            ApiError::Database(err) => {
                error!(error = %err, code = self.error_code(), "Database error occurred");
            }
            ApiError::Unauthorized => {
                warn!(code = self.error_code(), "Auth error occurred");
            }
            _ => {}
        }

        self.into_response_quiet()
    }
}

// Conversion implementations
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(resource) => ApiError::NotFound(resource.to_string()),
            StoreError::Database(err) => ApiError::Database(err),
            other => ApiError::Internal(other.into()),
        }
    }
}
