//! In-memory message record collection synchronized to a `PersistedStore`.
//!
//! `ConversationStore` exclusively owns the record collection. Every
//! mutating operation serializes the whole collection and writes it under
//! [`HISTORY_KEY`] before returning; there is no partial or incremental write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use madchat_types::chat::{MessageRecord, MessageRole};
use madchat_types::error::{PersistenceError, SessionError, ValidationError};

use crate::storage::persisted::{HISTORY_KEY, PersistedStore, load_json, save_json};

/// Result of a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameOutcome {
    /// Number of records whose title was rewritten.
    pub moved: usize,
    /// Whether the target title already named a conversation, so the two
    /// are now merged into one.
    pub merged: bool,
}

/// The message record collection plus its persistence.
pub struct ConversationStore<S: PersistedStore> {
    store: S,
    records: Vec<MessageRecord>,
}

impl<S: PersistedStore> ConversationStore<S> {
    /// Load the collection from `store`.
    ///
    /// A missing key yields an empty collection. A value that cannot be read
    /// or parsed is discarded with a diagnostic and the store starts empty;
    /// the stale value is overwritten by the next mutation.
    pub fn load(store: S) -> Self {
        let records = match load_json::<_, Vec<MessageRecord>>(&store, HISTORY_KEY) {
            Ok(Some(records)) => records,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable chat history");
                Vec::new()
            }
        };
        debug!(records = records.len(), "Chat history loaded");
        Self { store, records }
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Access the underlying persisted store.
    pub fn persisted(&self) -> &S {
        &self.store
    }

    /// Add one record and persist the collection.
    pub fn append(&mut self, record: MessageRecord) -> Result<(), PersistenceError> {
        self.records.push(record);
        self.persist()
    }

    /// Records of one conversation, oldest first.
    ///
    /// Records with equal timestamps keep their insertion order.
    pub fn filter_by_title(&self, title: &str) -> Vec<MessageRecord> {
        let mut matching: Vec<MessageRecord> = self
            .records
            .iter()
            .filter(|r| r.title == title)
            .cloned()
            .collect();
        matching.sort_by_key(MessageRecord::sort_key);
        matching
    }

    /// Whether any record carries `title`.
    pub fn contains(&self, title: &str) -> bool {
        self.records.iter().any(|r| r.title == title)
    }

    /// Number of user-role records in a conversation.
    pub fn user_message_count(&self, title: &str) -> u32 {
        self.records
            .iter()
            .filter(|r| r.title == title && r.role == MessageRole::User)
            .count() as u32
    }

    /// Distinct conversation titles, most recently active first.
    ///
    /// Ties on the latest timestamp are broken alphabetically so the
    /// listing is stable across reloads.
    pub fn list_titles(&self) -> Vec<String> {
        let mut latest: HashMap<&str, DateTime<Utc>> = HashMap::new();
        for record in self.records.iter().filter(|r| !r.title.is_empty()) {
            let ts = record.sort_key();
            latest
                .entry(record.title.as_str())
                .and_modify(|cur| {
                    if ts > *cur {
                        *cur = ts;
                    }
                })
                .or_insert(ts);
        }

        let mut titles: Vec<(&str, DateTime<Utc>)> = latest.into_iter().collect();
        titles.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        titles.into_iter().map(|(t, _)| t.to_string()).collect()
    }

    /// Rewrite `title` on every record of `old_title`.
    ///
    /// If `new_title` already names a conversation the two are merged:
    /// afterwards their records are indistinguishable. The outcome reports
    /// this so callers can warn about it. Renaming to the same title is a
    /// no-op; a blank target is rejected.
    pub fn rename(
        &mut self,
        old_title: &str,
        new_title: &str,
    ) -> Result<RenameOutcome, SessionError> {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if old_title == new_title {
            return Ok(RenameOutcome {
                moved: 0,
                merged: false,
            });
        }

        let merged = self.contains(new_title);
        let mut moved = 0;
        for record in self.records.iter_mut().filter(|r| r.title == old_title) {
            record.title = new_title.to_string();
            moved += 1;
        }

        if moved > 0 {
            self.persist()?;
        }
        Ok(RenameOutcome {
            moved,
            merged: merged && moved > 0,
        })
    }

    /// Delete every record of a conversation. Returns how many were removed.
    pub fn remove(&mut self, title: &str) -> Result<usize, PersistenceError> {
        let before = self.records.len();
        self.records.retain(|r| r.title != title);
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        save_json(&self.store, HISTORY_KEY, &self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap())
    }

    fn record(title: &str, role: MessageRole, content: &str, secs: i64) -> MessageRecord {
        MessageRecord {
            title: title.to_string(),
            role,
            content: content.to_string(),
            conversation_id: None,
            timestamp: at(secs),
        }
    }

    fn seeded() -> ConversationStore<Arc<MemoryStore>> {
        let mut store = ConversationStore::load(Arc::new(MemoryStore::new()));
        store.append(record("a", MessageRole::User, "a1", 1)).unwrap();
        store.append(record("b", MessageRole::User, "b1", 2)).unwrap();
        store.append(record("a", MessageRole::Assistant, "a2", 3)).unwrap();
        store.append(record("b", MessageRole::Assistant, "b2", 4)).unwrap();
        store
    }

    #[test]
    fn test_load_empty_store() {
        let store = ConversationStore::load(MemoryStore::new());
        assert!(store.records().is_empty());
        assert!(store.list_titles().is_empty());
    }

    #[test]
    fn test_load_discards_corrupt_history() {
        let backing = MemoryStore::new();
        backing.set(HISTORY_KEY, "{not json").unwrap();
        let store = ConversationStore::load(backing);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_append_persists_whole_collection() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = ConversationStore::load(Arc::clone(&backing));
        store.append(record("a", MessageRole::User, "hi", 1)).unwrap();
        store.append(record("a", MessageRole::Assistant, "what", 2)).unwrap();

        let raw = backing.get(HISTORY_KEY).unwrap().unwrap();
        let persisted: Vec<MessageRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.records());
    }

    #[test]
    fn test_reload_reproduces_records() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = ConversationStore::load(Arc::clone(&backing));
        store.append(record("a", MessageRole::User, "hi", 5)).unwrap();
        store.append(record("b", MessageRole::User, "yo", 1)).unwrap();
        let system = MessageRecord::new("a", MessageRole::System, "err", Some("c".into()));
        store.append(system).unwrap();

        let reloaded = ConversationStore::load(Arc::clone(&backing));
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_filter_by_title_orders_by_timestamp() {
        let mut store = ConversationStore::load(MemoryStore::new());
        store.append(record("a", MessageRole::Assistant, "late", 9)).unwrap();
        store.append(record("a", MessageRole::User, "early", 1)).unwrap();
        let mut untimed = record("a", MessageRole::System, "epoch", 0);
        untimed.timestamp = None;
        store.append(untimed).unwrap();

        let contents: Vec<String> = store
            .filter_by_title("a")
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["epoch", "early", "late"]);
    }

    #[test]
    fn test_list_titles_most_recent_first() {
        let mut store = seeded();
        assert_eq!(store.list_titles(), vec!["b", "a"]);

        store.append(record("a", MessageRole::User, "a3", 10)).unwrap();
        assert_eq!(store.list_titles(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_titles_skips_untitled_records() {
        let mut store = seeded();
        store.append(record("", MessageRole::System, "orphan", 20)).unwrap();
        assert_eq!(store.list_titles(), vec!["b", "a"]);
    }

    #[test]
    fn test_user_message_count() {
        let store = seeded();
        assert_eq!(store.user_message_count("a"), 1);
        assert_eq!(store.user_message_count("missing"), 0);
    }

    #[test]
    fn test_rename_moves_records() {
        let mut store = seeded();
        let outcome = store.rename("a", "renamed").unwrap();
        assert_eq!(outcome, RenameOutcome { moved: 2, merged: false });
        assert!(store.filter_by_title("a").is_empty());
        assert_eq!(store.filter_by_title("renamed").len(), 2);
    }

    #[test]
    fn test_rename_onto_existing_title_merges() {
        let mut store = seeded();
        let outcome = store.rename("a", "b").unwrap();
        assert!(outcome.merged);
        assert_eq!(outcome.moved, 2);

        let contents: Vec<String> = store
            .filter_by_title("b")
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["a1", "b1", "a2", "b2"]);
        assert_eq!(store.list_titles(), vec!["b"]);
    }

    #[test]
    fn test_rename_rejects_blank_target() {
        let mut store = seeded();
        let err = store.rename("a", "   ").unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::EmptyTitle)));
        assert_eq!(store.filter_by_title("a").len(), 2);
    }

    #[test]
    fn test_rename_same_title_is_noop() {
        let mut store = seeded();
        let outcome = store.rename("a", "a").unwrap();
        assert_eq!(outcome.moved, 0);
        assert!(!outcome.merged);
    }

    #[test]
    fn test_rename_missing_title_moves_nothing() {
        let mut store = seeded();
        let outcome = store.rename("ghost", "b").unwrap();
        assert_eq!(outcome, RenameOutcome { moved: 0, merged: false });
    }

    #[test]
    fn test_remove_leaves_other_titles() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = ConversationStore::load(Arc::clone(&backing));
        store.append(record("a", MessageRole::User, "a1", 1)).unwrap();
        store.append(record("b", MessageRole::User, "b1", 2)).unwrap();

        assert_eq!(store.remove("a").unwrap(), 1);
        assert!(store.filter_by_title("a").is_empty());
        assert_eq!(store.filter_by_title("b").len(), 1);

        let reloaded = ConversationStore::load(backing);
        assert_eq!(reloaded.list_titles(), vec!["b"]);
    }

    #[test]
    fn test_remove_missing_title() {
        let mut store = seeded();
        assert_eq!(store.remove("ghost").unwrap(), 0);
        assert_eq!(store.records().len(), 4);
    }
}
