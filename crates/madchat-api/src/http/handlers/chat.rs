//! `/chat` and `/health` handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use madchat_core::backend::ChatBackend;
use madchat_core::llm::LlmProvider;
use madchat_types::gateway::{ChatRequest, ChatResponse};

use crate::http::error::AppError;

/// POST /chat - generate the persona's reply to one message.
pub async fn chat<P: LlmProvider + 'static>(
    State(backend): State<Arc<ChatBackend<P>>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let response = backend.handle(request).await?;
    Ok(Json(response))
}

/// GET /health - liveness probe.
pub async fn health<P: LlmProvider + 'static>(
    State(backend): State<Arc<ChatBackend<P>>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": backend.model(),
        "conversations": backend.conversation_count(),
    }))
}
