//! Storage abstractions.
//!
//! Defines the key-value store port. Implementations live in linghua-infra.

pub mod kv_store;

#[cfg(test)]
pub(crate) mod memory;
