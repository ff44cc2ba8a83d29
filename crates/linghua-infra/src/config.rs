//! `config.toml` loading.
//!
//! Every setting has a default, so a missing, unreadable, or malformed file
//! never stops the assistant from starting.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use linghua_types::config::{DEFAULT_STORAGE_KEY, LinghuaConfig};

pub const CONFIG_FILE: &str = "config.toml";

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read `{data_dir}/config.toml`, falling back to [`LinghuaConfig::default()`].
pub async fn load_config(data_dir: &Path) -> LinghuaConfig {
    let path = config_path(data_dir);

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return LinghuaConfig::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Config file unreadable, using defaults");
            return LinghuaConfig::default();
        }
    };

    match toml::from_str::<LinghuaConfig>(&raw) {
        Ok(config) => normalize(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Config file malformed, using defaults");
            LinghuaConfig::default()
        }
    }
}

/// Repair values that would leave the chat unusable.
fn normalize(mut config: LinghuaConfig) -> LinghuaConfig {
    if config.history_limit == 0 {
        tracing::warn!("history_limit = 0 would drop every message; using 1");
        config.history_limit = 1;
    }
    if config.storage_key.trim().is_empty() {
        config.storage_key = DEFAULT_STORAGE_KEY.to_string();
    }
    config
}
