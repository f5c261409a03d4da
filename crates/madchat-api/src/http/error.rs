//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use madchat_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request itself was unusable.
    Validation(String),
    /// The upstream model failed.
    Upstream(LlmError),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::InvalidRequest(msg) => AppError::Validation(msg),
            other => AppError::Upstream(other),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(LlmError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                "UPSTREAM_RATE_LIMITED",
                LlmError::RateLimited.to_string(),
            ),
            AppError::Upstream(e) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, message = %message, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
