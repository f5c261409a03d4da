//! Filesystem adapters for madchat.
//!
//! Provides the file-backed [`FileStore`] and data directory resolution.

pub mod store;

use std::path::PathBuf;

pub use store::FileStore;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MADCHAT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MADCHAT_DATA_DIR` environment variable
/// 2. `~/.madchat` under the user's home directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".madchat");
    }

    // Last resort: current directory
    PathBuf::from(".madchat")
}
