//! LlmProvider trait definition.
//!
//! The upstream model port used by the generation backend. Implementations
//! live in madchat-infra (e.g., `AnthropicClient`).

use madchat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for upstream text generation providers.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
