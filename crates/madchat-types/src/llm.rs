//! Completion request/response types for the upstream model.
//!
//! Used only by the generation backend. The client never sees these; it
//! talks to the backend through the [`crate::gateway`] wire types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::MessageRole;

/// A single turn in an upstream completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to the upstream model for a non-streaming completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Text returned by the upstream model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}

/// Errors from the upstream model provider.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_skips_unset_sampling() {
        let req = CompletionRequest {
            model: "claude-3-haiku-20240307".to_string(),
            messages: vec![Message::user("hello")],
            system: None,
            max_tokens: 400,
            temperature: Some(0.3),
            top_p: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.3);
        assert!(json.get("system").is_none());
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn test_llm_error_display() {
        assert_eq!(LlmError::AuthenticationFailed.to_string(), "authentication failed");
        let err = LlmError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500");
    }
}
