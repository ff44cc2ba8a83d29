//! Durable string storage port.
//!
//! The chat history is one JSON document under a single key, so the port only
//! needs whole-value reads and writes. `linghua-infra` provides the SQLite
//! implementation; tests use an in-memory map.

use std::future::Future;

use linghua_types::error::RepositoryError;

pub trait KvStore: Send + Sync {
    /// Stored value, or `None` when nothing was written under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Replace the value under `key`, creating it if needed.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
