//! ChatGateway trait definition and request parameters.
//!
//! The gateway is the remote request/response boundary to the generation
//! service. The session controller depends on it; implementations live in
//! madchat-infra (e.g., `HttpChatGateway`).

use madchat_types::config::ClientConfig;
use madchat_types::error::GatewayError;
use madchat_types::gateway::{ChatRequest, ChatResponse};
use madchat_types::persona::PersonalityMode;

/// Trait for the remote chat service.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatGateway: Send + Sync {
    /// Send one user message and wait for the persona's reply.
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatResponse, GatewayError>> + Send;
}

/// Upper bound on the generation budget the client will ask for.
const MAX_NEW_TOKENS_CEILING: u32 = 1000;

/// Generation parameters sent along with every message.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub personality_mode: PersonalityMode,
    pub temperature: f64,
    pub top_p: f64,
    pub max_new_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for GenerationSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            personality_mode: config.personality_mode,
            temperature: config.temperature,
            top_p: config.top_p,
            max_new_tokens: config.max_new_tokens,
        }
        .clamped()
    }
}

impl GenerationSettings {
    /// Clamp temperature and top_p to `[0, 1]` and the token budget to `[1, 1000]`.
    pub fn clamped(self) -> Self {
        Self {
            personality_mode: self.personality_mode,
            temperature: clamp_unit(self.temperature),
            top_p: clamp_unit(self.top_p),
            max_new_tokens: self.max_new_tokens.clamp(1, MAX_NEW_TOKENS_CEILING),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_client_config() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.personality_mode, PersonalityMode::Normal);
        assert!((settings.temperature - 0.3).abs() < f64::EPSILON);
        assert!((settings.top_p - 0.9).abs() < f64::EPSILON);
        assert_eq!(settings.max_new_tokens, 400);
    }

    #[test]
    fn test_clamping() {
        let settings = GenerationSettings {
            personality_mode: PersonalityMode::Zesty,
            temperature: 1.7,
            top_p: -0.2,
            max_new_tokens: 5000,
        }
        .clamped();
        assert_eq!(settings.temperature, 1.0);
        assert_eq!(settings.top_p, 0.0);
        assert_eq!(settings.max_new_tokens, 1000);

        let zero_budget = GenerationSettings {
            max_new_tokens: 0,
            ..GenerationSettings::default()
        }
        .clamped();
        assert_eq!(zero_budget.max_new_tokens, 1);
    }

    #[test]
    fn test_nan_temperature_clamps_to_zero() {
        let settings = GenerationSettings {
            temperature: f64::NAN,
            ..GenerationSettings::default()
        }
        .clamped();
        assert_eq!(settings.temperature, 0.0);
    }
}
