//! Error-to-response mapping.
//!
//! The payload shape is always `{"error": "<message>"}`. Input errors carry
//! descriptive messages; upstream failures carry a generic per-endpoint
//! message with the detail confined to a server-side log line.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tutor_core::AppError;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Map an upstream failure to a generic 500 for the caller, logging the
    /// real cause server-side only.
    pub fn upstream(endpoint: &str, public_message: impl Into<String>, cause: &AppError) -> Self {
        tracing::error!("Upstream failure in {}: {}", endpoint, cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: public_message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
