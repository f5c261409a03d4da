//! Configuration types for madchat.
//!
//! `MadchatConfig` represents the top-level `madchat.toml` with a
//! `[client]` table (how the chat client talks to the gateway) and a
//! `[server]` table (how `madchat serve` runs the generation backend).

use serde::{Deserialize, Serialize};

use crate::persona::PersonalityMode;

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MadchatConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings used when sending messages through the chat gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the generation backend (without the `/chat` path).
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default)]
    pub personality_mode: PersonalityMode,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Whole-request timeout for gateway calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_top_p() -> f64 {
    0.9
}

fn default_max_new_tokens() -> u32 {
    400
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            personality_mode: PersonalityMode::default(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_new_tokens: default_max_new_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Settings for the `/chat` generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,

    /// Shape the system prompt from the anger level and glitch the reply.
    #[serde(default = "default_use_prompt_utils")]
    pub use_prompt_utils: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_use_prompt_utils() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model: default_model(),
            anthropic_base_url: default_anthropic_base_url(),
            use_prompt_utils: default_use_prompt_utils(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = MadchatConfig::default();
        assert_eq!(config.client.gateway_url, "http://localhost:8000");
        assert_eq!(config.client.max_new_tokens, 400);
        assert_eq!(config.client.personality_mode, PersonalityMode::Normal);
        assert_eq!(config.server.port, 8000);
        assert!(config.server.use_prompt_utils);
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: MadchatConfig = toml::from_str("").unwrap();
        assert_eq!(config.client.gateway_url, "http://localhost:8000");
        assert_eq!(config.server.model, "claude-3-haiku-20240307");
    }

    #[test]
    fn test_config_deserialize_partial_tables() {
        let toml_str = r#"
[client]
gateway_url = "http://10.0.0.5:9000"
personality_mode = "zesty"
temperature = 0.8

[server]
port = 9000
use_prompt_utils = false
"#;
        let config: MadchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.client.gateway_url, "http://10.0.0.5:9000");
        assert_eq!(config.client.personality_mode, PersonalityMode::Zesty);
        assert!((config.client.temperature - 0.8).abs() < f64::EPSILON);
        assert!((config.client.top_p - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.server.use_prompt_utils);
    }
}
