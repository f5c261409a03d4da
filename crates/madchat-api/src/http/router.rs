//! Axum router configuration with middleware.
//!
//! Routes: `POST /chat`, `GET /health`.
//! Middleware: CORS (any origin), request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use madchat_core::backend::ChatBackend;
use madchat_core::llm::LlmProvider;

use crate::http::handlers;

/// Build the router around a shared backend.
pub fn build_router<P: LlmProvider + 'static>(backend: Arc<ChatBackend<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handlers::chat::chat::<P>))
        .route("/health", get(handlers::chat::health::<P>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(backend)
}
