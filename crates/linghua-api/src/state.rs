//! Application state shared by every CLI command.
//!
//! Resolves the data directory, loads configuration, and opens the SQLite
//! key-value store the chat history lives in.

use std::path::PathBuf;

use anyhow::Context;
use linghua_core::chat::history::HistoryStore;
use linghua_infra::config::load_config;
use linghua_infra::filesystem::resolve_data_dir;
use linghua_infra::sqlite::kv::SqliteKvStore;
use linghua_infra::sqlite::pool::DatabasePool;
use linghua_types::config::LinghuaConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: LinghuaConfig,
    pub data_dir: PathBuf,
    pub kv_store: SqliteKvStore,
}

impl AppState {
    /// Initialize the application state: data dir, config, database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_pool = DatabasePool::open(&data_dir)
            .await
            .context("Failed to open the assistant database")?;

        tracing::debug!(data_dir = %data_dir.display(), "Application state ready");

        Ok(Self {
            config,
            data_dir,
            kv_store: SqliteKvStore::new(db_pool),
        })
    }

    /// Open the persisted chat history using the configured key and cap.
    pub async fn open_history(&self) -> HistoryStore<SqliteKvStore> {
        HistoryStore::open(
            self.kv_store.clone(),
            self.config.storage_key.clone(),
            self.config.history_limit,
        )
        .await
    }
}
