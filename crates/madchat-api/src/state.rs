//! Application state wiring the stores and configuration together.
//!
//! AppState pins the core's generic stores to the file-backed infra
//! implementation so every CLI command sees the same persisted data.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use madchat_core::chat::store::ConversationStore;
use madchat_core::profile::ProfileStore;
use madchat_infra::config::load_config;
use madchat_infra::filesystem::{FileStore, resolve_data_dir};
use madchat_types::config::MadchatConfig;

/// Concrete store type used by the binary.
pub type SharedStore = Arc<FileStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<MadchatConfig>,
    pub store: SharedStore,
}

impl AppState {
    /// Resolve the data directory, load `madchat.toml` and open the store.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        let store = FileStore::open(data_dir.join("store"))
            .with_context(|| format!("failed to open store in {}", data_dir.display()))?;

        tracing::debug!(data_dir = %data_dir.display(), "Application state initialized");

        Ok(Self {
            data_dir,
            config: Arc::new(config),
            store: Arc::new(store),
        })
    }

    /// Load the conversation history.
    pub fn conversations(&self) -> ConversationStore<SharedStore> {
        ConversationStore::load(Arc::clone(&self.store))
    }

    pub fn profiles(&self) -> ProfileStore<SharedStore> {
        ProfileStore::new(Arc::clone(&self.store))
    }
}
