//! Wire types for the `POST /chat` gateway.
//!
//! The same shapes are used by the HTTP client in `madchat-infra` and by
//! the generation backend served from `madchat-api`. Every field except
//! `message_content` has a server-side default so that older or minimal
//! clients can still talk to the backend.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message_content: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub anger_level: u32,
    #[serde(default = "default_personality_mode")]
    pub personality_mode: String,
    #[serde(default)]
    pub glitch_level: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Overrides the backend's configured prompt shaping when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_prompt_utils: Option<bool>,
    #[serde(default, rename = "userData")]
    pub user_data: Option<UserProfile>,
}

/// Successful response body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
}

pub fn default_personality_mode() -> String {
    "normal".to_string()
}

pub fn default_temperature() -> f64 {
    0.3
}

pub fn default_top_p() -> f64 {
    0.9
}

pub fn default_max_new_tokens() -> u32 {
    400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_gets_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"message_content":"hi"}"#).unwrap();
        assert_eq!(req.message_content, "hi");
        assert_eq!(req.conversation_id, None);
        assert_eq!(req.anger_level, 0);
        assert_eq!(req.personality_mode, "normal");
        assert!((req.temperature - 0.3).abs() < f64::EPSILON);
        assert!((req.top_p - 0.9).abs() < f64::EPSILON);
        assert_eq!(req.max_new_tokens, 400);
        assert!(req.user_data.is_none());
    }

    #[test]
    fn test_request_serializes_nulls_and_user_data_key() {
        let req = ChatRequest {
            message_content: "hi".to_string(),
            conversation_id: None,
            system_prompt: None,
            anger_level: 10,
            personality_mode: "normal".to_string(),
            glitch_level: 0.0,
            temperature: 0.3,
            top_p: 0.9,
            max_new_tokens: 400,
            use_prompt_utils: None,
            user_data: Some(UserProfile {
                name: "Sam".to_string(),
                gender: None,
                age: None,
            }),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value["conversation_id"].is_null());
        assert!(value["system_prompt"].is_null());
        assert_eq!(value["userData"]["name"], "Sam");
        assert!(value.get("use_prompt_utils").is_none());
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let json = r#"{"conversation_id":"abc","response":"go away","extra":1}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.conversation_id, "abc");
        assert_eq!(resp.response, "go away");
        assert!(resp.user_message.is_none());
    }
}
