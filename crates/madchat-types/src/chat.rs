//! Message record, level and session state types for madchat.
//!
//! A conversation is not stored as its own entity: it is the set of
//! [`MessageRecord`]s sharing a `title`, ordered by timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Maximum number of user messages in one conversation.
pub const MESSAGE_CAP: u32 = 20;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message belonging to a conversation.
///
/// Records are immutable once created, except for `title` which is
/// rewritten when a conversation is renamed (or merged into another).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub title: String,
    pub role: MessageRole,
    pub content: String,
    /// Server-side conversation id, once the gateway has assigned one.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Creation time. Records persisted without one sort as the epoch.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            role,
            content: content.into(),
            conversation_id,
            timestamp: Some(Utc::now()),
        }
    }

    /// Timestamp used for ordering; a missing timestamp is the Unix epoch.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Escalation levels derived from the user message count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Levels {
    /// 0..=100 in steps of 10.
    pub anger: u8,
    /// 0.0..=0.7 in steps of 0.1.
    pub glitch: f64,
}

/// Transient view of the active conversation.
///
/// Never persisted: it is rebuilt from the message records whenever a
/// conversation is selected or a new one is started.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionState {
    pub current_title: Option<String>,
    pub conversation_id: Option<String>,
    pub message_count: u32,
    pub anger_level: u8,
    pub glitch_level: f64,
    pub loading: bool,
}

impl SessionState {
    /// Whether another user message may be sent in this conversation.
    pub fn has_capacity(&self) -> bool {
        self.message_count < MESSAGE_CAP
    }
}
