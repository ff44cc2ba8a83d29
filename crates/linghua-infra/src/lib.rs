//! Infrastructure implementations for the Linghua assistant.
//!
//! SQLite-backed key-value store, configuration loading, and data directory
//! resolution. Implements the ports defined in `linghua-core`.

pub mod config;
pub mod filesystem;
pub mod sqlite;
