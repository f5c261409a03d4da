//! PersistedStore trait definition and JSON helpers.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use madchat_types::error::PersistenceError;

/// Key holding the flat, ordered message record collection.
pub const HISTORY_KEY: &str = "chat_history";

/// Key holding the logged-in user profile (absent when logged out).
pub const PROFILE_KEY: &str = "user_data";

/// Synchronous string key-value persistence.
///
/// `set` must replace the stored value atomically: a reader sees either the
/// previous value or the new one, never a partial write.
pub trait PersistedStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Set a value for a key (upsert).
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete a key. No-op if key does not exist.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<T: PersistedStore + ?Sized> PersistedStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// Read and deserialize a JSON value.
///
/// A value that fails to parse is reported as [`PersistenceError::Corrupt`].
pub fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, PersistenceError>
where
    S: PersistedStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| PersistenceError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Serialize a value as JSON and store it under `key`.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), PersistenceError>
where
    S: PersistedStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw =
        serde_json::to_string(value).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
    store.set(key, &raw)
}
