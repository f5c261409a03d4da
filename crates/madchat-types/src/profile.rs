//! User profile collected at login.

use serde::{Deserialize, Serialize};

/// The logged-in user.
///
/// Only `name` is required. The profile is forwarded to the chat gateway
/// with every request so the persona can address the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}
