//! File-backed implementation of [`PersistedStore`].
//!
//! Each key is a file `{dir}/{key}.json`. Writes go to a temporary file in
//! the same directory which is then renamed over the target, so a crash
//! mid-write leaves either the old value or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use madchat_core::storage::PersistedStore;
use madchat_types::error::PersistenceError;

/// Durable key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistedStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| PersistenceError::from(e.error))?;
        tracing::trace!(key, bytes = value.len(), "Persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_key(key: &str) -> Result<(), PersistenceError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::Io(format!("invalid store key '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madchat_core::chat::store::ConversationStore;
    use madchat_core::storage::HISTORY_KEY;
    use madchat_types::chat::{MessageRecord, MessageRole};
    use tempfile::tempdir;

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("user_data", r#"{"name":"Sam"}"#).unwrap();
        assert_eq!(store.get("user_data").unwrap().as_deref(), Some(r#"{"name":"Sam"}"#));
        assert!(dir.path().join("user_data.json").exists());
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("chat_history").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        // No temp files left behind
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.set("../escape", "v").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.remove("").is_err());
    }

    #[test]
    fn test_conversations_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut convos = ConversationStore::load(FileStore::open(dir.path()).unwrap());
            convos
                .append(MessageRecord::new("Hello", MessageRole::User, "Hello", None))
                .unwrap();
            convos
                .append(MessageRecord::new(
                    "Hello",
                    MessageRole::Assistant,
                    "What.",
                    Some("c-1".to_string()),
                ))
                .unwrap();
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        assert!(reopened.get(HISTORY_KEY).unwrap().is_some());
        let convos = ConversationStore::load(reopened);
        assert_eq!(convos.list_titles(), vec!["Hello".to_string()]);
        assert_eq!(convos.user_message_count("Hello"), 1);
    }
}
