//! AnthropicClient -- concrete [`LlmProvider`] for Anthropic Claude.
//!
//! Sends non-streaming requests to the Messages API (`/v1/messages`). The API
//! key is wrapped in [`secrecy::SecretString`] and is never logged or included
//! in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use madchat_core::llm::LlmProvider;
use madchat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::types::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Default Anthropic API host.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic Claude provider.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicClient {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_anthropic_request(request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
            top_p: request.top_p,
        }
    }
}

impl LlmProvider for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_anthropic_request(request);

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                529 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = resp
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            id: resp.id,
            content,
            model: resp.model,
        })
    }
}
