//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LINGHUA_DATA_DIR";

/// Resolve the data directory holding `linghua.db` and `config.toml`.
///
/// Priority: `LINGHUA_DATA_DIR`, then `~/.linghua`, then `./.linghua`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".linghua");
    }

    PathBuf::from(".linghua")
}
