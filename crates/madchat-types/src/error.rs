use thiserror::Error;

/// Rejected input. Never fatal and never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("message cap of {cap} reached for this conversation")]
    MessageCapReached { cap: u32 },

    #[error("display name is required")]
    EmptyName,

    #[error("conversation title is required")]
    EmptyTitle,
}

/// Failures talking to the chat gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("gateway returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("request cancelled")]
    Cancelled,
}

/// Errors from the persisted key-value store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("corrupt value for key '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

/// Errors surfaced by session and store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MessageCapReached { cap: 20 };
        assert_eq!(err.to_string(), "message cap of 20 reached for this conversation");
    }

    #[test]
    fn test_gateway_status_display() {
        let err = GatewayError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "gateway returned HTTP 502");
    }

    #[test]
    fn test_session_error_is_transparent() {
        let err: SessionError = ValidationError::EmptyMessage.into();
        assert_eq!(err.to_string(), "message is empty");
        assert!(matches!(err, SessionError::Validation(ValidationError::EmptyMessage)));
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Corrupt {
            key: "chat_history".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(err.to_string().contains("chat_history"));
    }
}
