//! HTTP layer for the `/chat` generation backend.
//!
//! Axum router with CORS and request tracing in front of a shared
//! [`ChatBackend`] that forwards to Anthropic.

pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use madchat_core::backend::ChatBackend;
use madchat_infra::llm::anthropic::AnthropicClient;
use madchat_types::config::ServerConfig;

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Build the Anthropic-backed chat backend from server configuration.
pub fn build_backend(config: &ServerConfig) -> anyhow::Result<Arc<ChatBackend<AnthropicClient>>> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .with_context(|| format!("{API_KEY_ENV} is not set"))?;

    let client = AnthropicClient::new(SecretString::from(api_key))?
        .with_base_url(config.anthropic_base_url.clone());

    tracing::info!(
        model = %config.model,
        use_prompt_utils = config.use_prompt_utils,
        "Chat backend configured"
    );

    Ok(Arc::new(ChatBackend::new(
        client,
        config.model.clone(),
        config.use_prompt_utils,
    )))
}
