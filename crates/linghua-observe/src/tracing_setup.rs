//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! // Warnings only, unless RUST_LOG says otherwise
//! linghua_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // Debug logging with OpenTelemetry export to stdout
//! linghua_observe::tracing_setup::init_tracing("info,linghua=debug", true).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Instrumentation scope name reported on exported spans.
const TRACER_NAME: &str = "linghua";

/// Kept so `shutdown_tracing` can flush the exporter.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` when set and valid, else `default_directives`.
fn build_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install a stdout span exporter as the global tracer provider.
fn stdout_tracer() -> SdkTracer {
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();
    let tracer = provider.tracer(TRACER_NAME);

    let _ = TRACER_PROVIDER.set(provider.clone());
    opentelemetry::global::set_tracer_provider(provider);
    tracer
}

/// Install the global subscriber.
///
/// Log lines go to stderr so they never interleave with the transcript on
/// stdout. With `enable_otel`, spans are also exported to stdout.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_directives: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let otel_layer = enable_otel.then(|| tracing_opentelemetry::layer().with_tracer(stdout_tracer()));

    tracing_subscriber::registry()
        .with(build_filter(default_directives))
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush and stop the span exporter. No-op when `--otel` was off.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: span exporter shutdown failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_verbose_directives() {
        let filter = build_filter("info,linghua=debug");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_stdout_tracer_registers_provider() {
        let _tracer = stdout_tracer();
        assert!(TRACER_PROVIDER.get().is_some());
        shutdown_tracing();
    }

    #[test]
    fn test_shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
