//! Observability setup for the Linghua assistant.

pub mod tracing_setup;
