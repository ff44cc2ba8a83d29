//! Shared domain types for the Linghua marketing assistant.
//!
//! Chat messages and history, page sections, creative-panel requests,
//! configuration, and the error types shared by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod creative;
pub mod error;
pub mod section;
