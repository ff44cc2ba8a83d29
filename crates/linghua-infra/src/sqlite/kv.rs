//! `KvStore` over the `kv_store` table.
//!
//! Reads go to the reader pool, writes to the single writer connection.
//! Values are stored as given; the history store owns the JSON encoding.

use chrono::Utc;
use linghua_core::storage::kv_store::KvStore;
use linghua_types::error::RepositoryError;

use super::pool::DatabasePool;

const UPSERT: &str = r#"INSERT INTO kv_store (key, value, created_at, updated_at)
VALUES (?1, ?2, ?3, ?3)
ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#;

#[derive(Clone)]
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Every stored key in ascending order.
    pub async fn list_keys(&self) -> Result<Vec<String>, RepositoryError> {
        sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)
    }
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let written = sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        tracing::trace!(key, bytes = value.len(), rows = written.rows_affected(), "kv set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        let removed = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        tracing::trace!(key, rows = removed.rows_affected(), "kv delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;
    use linghua_core::chat::history::HistoryStore;
    use linghua_types::chat::ChatMessage;

    async fn test_store() -> (SqliteKvStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(dir.path()).await.unwrap();
        (SqliteKvStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let (store, _dir) = test_store().await;
        store.set("greeting", "你好").await.unwrap();
        assert_eq!(store.get("greeting").await.unwrap(), Some("你好".to_string()));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (store, _dir) = test_store().await;
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let (store, _dir) = test_store().await;
        store.set("counter", "1").await.unwrap();
        store.set("counter", "2").await.unwrap();
        assert_eq!(store.get("counter").await.unwrap(), Some("2".to_string()));
        assert_eq!(store.list_keys().await.unwrap(), vec!["counter"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _dir) = test_store().await;
        store.set("temp", "value").await.unwrap();
        store.delete("temp").await.unwrap();
        assert!(store.get("temp").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_noop() {
        let (store, _dir) = test_store().await;
        store.delete("nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_keys_sorted() {
        let (store, _dir) = test_store().await;
        store.set("beta", "b").await.unwrap();
        store.set("alpha", "a").await.unwrap();
        assert_eq!(store.list_keys().await.unwrap(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SqliteKvStore::new(DatabasePool::open(dir.path()).await.unwrap());
            let mut history = HistoryStore::new(store, "linghuaqian-chat");
            history.append(ChatMessage::user("洗车营销")).await.unwrap();
            history.append(ChatMessage::assistant("建议")).await.unwrap();
        }

        let store = SqliteKvStore::new(DatabasePool::open(dir.path()).await.unwrap());
        let history = HistoryStore::open(store, "linghuaqian-chat", 100).await;
        assert_eq!(history.history().len(), 2);
        assert_eq!(history.history().messages()[0].content, "洗车营销");
    }
}
