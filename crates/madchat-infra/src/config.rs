//! Configuration loader for madchat.
//!
//! Reads `madchat.toml` from the data directory (`~/.madchat/` in production)
//! and deserializes it into [`MadchatConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use madchat_types::config::MadchatConfig;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "madchat.toml";

/// Path of the configuration file for a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load configuration from `{data_dir}/madchat.toml`.
///
/// - If the file does not exist, returns [`MadchatConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> MadchatConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE} found at {}, using defaults", path.display());
            return MadchatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return MadchatConfig::default();
        }
    };

    match toml::from_str::<MadchatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            MadchatConfig::default()
        }
    }
}
