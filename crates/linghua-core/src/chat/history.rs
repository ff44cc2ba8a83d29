//! Persisted, capped chat history.
//!
//! `HistoryStore` keeps the working copy of the history in memory and writes
//! the whole sequence back to the key-value store after every mutation.
//! Reads fail soft: a missing, unreadable, or malformed record is an empty
//! history.

use linghua_types::chat::{ChatHistory, ChatMessage};
use linghua_types::config::DEFAULT_HISTORY_LIMIT;
use linghua_types::error::RepositoryError;
use tracing::{debug, warn};

use crate::storage::kv_store::KvStore;

/// Owned chat history backed by a `KvStore` record.
pub struct HistoryStore<S: KvStore> {
    store: S,
    key: String,
    limit: usize,
    history: ChatHistory,
}

impl<S: KvStore> HistoryStore<S> {
    /// Create a store over `key` with the default 100-message cap.
    ///
    /// The working copy starts empty; call [`load`](Self::load) to read the
    /// persisted record.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self::with_limit(store, key, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(store: S, key: impl Into<String>, limit: usize) -> Self {
        Self {
            store,
            key: key.into(),
            limit: limit.max(1),
            history: ChatHistory::new(),
        }
    }

    /// Create the store and load the persisted record in one step.
    pub async fn open(store: S, key: impl Into<String>, limit: usize) -> Self {
        let mut this = Self::with_limit(store, key, limit);
        this.load().await;
        this
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The current working copy.
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-read the persisted record, replacing the working copy.
    ///
    /// Never fails: absent or malformed data yields an empty history. A
    /// record longer than the cap is trimmed from the front.
    #[tracing::instrument(name = "history_load", skip(self), fields(key = %self.key))]
    pub async fn load(&mut self) -> ChatHistory {
        let raw = match self.store.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read chat history, starting empty");
                None
            }
        };

        let mut history = match raw {
            None => {
                debug!(key = %self.key, "No persisted chat history");
                ChatHistory::new()
            }
            Some(raw) => match serde_json::from_str::<ChatHistory>(&raw) {
                Ok(history) => history,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Malformed chat history record, starting empty");
                    ChatHistory::new()
                }
            },
        };

        let dropped = history.truncate_front(self.limit);
        if dropped > 0 {
            debug!(dropped, limit = self.limit, "Trimmed oversized chat history on load");
        }

        self.history = history;
        self.history.clone()
    }

    /// Append a message, evicting the oldest past the cap, and persist.
    ///
    /// The working copy is updated even when persisting fails; the error is
    /// returned so the caller can decide how loudly to report it.
    #[tracing::instrument(
        name = "history_append",
        skip(self, message),
        fields(key = %self.key, role = %message.role)
    )]
    pub async fn append(&mut self, message: ChatMessage) -> Result<ChatHistory, RepositoryError> {
        let evicted = self.history.push_capped(message, self.limit);
        if evicted > 0 {
            debug!(evicted, len = self.history.len(), "Evicted oldest chat messages");
        }
        self.persist().await?;
        Ok(self.history.clone())
    }

    /// Empty the history and remove the persisted record.
    #[tracing::instrument(name = "history_clear", skip(self), fields(key = %self.key, len = self.history.len()))]
    pub async fn clear(&mut self) -> Result<ChatHistory, RepositoryError> {
        self.history.clear();
        self.store.delete(&self.key).await?;
        debug!(key = %self.key, "Chat history cleared");
        Ok(ChatHistory::new())
    }

    async fn persist(&self) -> Result<(), RepositoryError> {
        let encoded = serde_json::to_string(&self.history)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &encoded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;
    use linghua_types::chat::ChatRole;

    const KEY: &str = "linghuaqian-chat";

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let mut store = HistoryStore::new(MemoryKvStore::new(), KEY);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let kv = MemoryKvStore::new().with_value(KEY, "{not json");
        let mut store = HistoryStore::new(kv, KEY);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_empty() {
        let kv = MemoryKvStore::new().with_value(KEY, r#"[{"role":"robot","content":"x"}]"#);
        let mut store = HistoryStore::new(kv, KEY);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_persists_record() {
        let mut store = HistoryStore::new(MemoryKvStore::new(), KEY);
        store.append(ChatMessage::user("hello")).await.unwrap();

        let raw = store.store().raw(KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[0]["content"], "hello");
        assert!(value[0]["time"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let mut store = HistoryStore::new(MemoryKvStore::new(), KEY);
        let mut last = ChatHistory::new();
        for i in 0..101 {
            last = store.append(ChatMessage::user(format!("msg-{i}"))).await.unwrap();
        }
        assert_eq!(last.len(), 100);
        assert_eq!(last.first().unwrap().content, "msg-1");
        assert_eq!(last.last().unwrap().content, "msg-100");

        let reloaded = store.load().await;
        assert_eq!(reloaded, last);
    }

    #[tokio::test]
    async fn test_clear_then_load_is_empty() {
        let mut store = HistoryStore::new(MemoryKvStore::new(), KEY);
        store.append(ChatMessage::user("a")).await.unwrap();
        store.append(ChatMessage::assistant("b")).await.unwrap();

        assert!(store.clear().await.unwrap().is_empty());
        assert!(store.store().raw(KEY).is_none());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_reads_existing_record() {
        let mut first = HistoryStore::new(MemoryKvStore::new(), KEY);
        first.append(ChatMessage::user("q")).await.unwrap();
        first.append(ChatMessage::assistant("a")).await.unwrap();
        let raw = first.store().raw(KEY).unwrap();

        let reopened = HistoryStore::open(MemoryKvStore::new().with_value(KEY, &raw), KEY, 100).await;
        let roles: Vec<ChatRole> = reopened.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[tokio::test]
    async fn test_oversized_record_trimmed_on_load() {
        let history: ChatHistory = (0..5)
            .map(|i| ChatMessage::user(format!("m{i}")))
            .collect::<Vec<_>>()
            .into();
        let raw = serde_json::to_string(&history).unwrap();
        let store = HistoryStore::open(MemoryKvStore::new().with_value(KEY, &raw), KEY, 3).await;
        assert_eq!(store.history().len(), 3);
        assert_eq!(store.history().first().unwrap().content, "m2");
    }

    #[tokio::test]
    async fn test_failed_write_still_updates_working_copy() {
        let mut store = HistoryStore::new(MemoryKvStore::new(), KEY);
        store.store().set_fail_writes(true);
        assert!(store.append(ChatMessage::user("kept")).await.is_err());
        assert_eq!(store.history().len(), 1);
    }
}
