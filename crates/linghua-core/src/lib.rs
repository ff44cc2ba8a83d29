//! Business logic and port trait definitions for the Linghua assistant.
//!
//! This crate defines the "ports" (key-value store, chat view) that the
//! infrastructure and presentation layers implement. It depends only on
//! `linghua-types` -- never on `linghua-infra` or any database/IO crate.

pub mod chat;
pub mod creative;
pub mod stats;
pub mod storage;
