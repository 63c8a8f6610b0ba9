//! Tracing subscriber configuration for mural nodes.
//!
//! Log levels follow these conventions:
//! - WARN: per-peer failures, malformed input, rejected requests, outages
//! - INFO: connections, authentications, publishes, reconciliation rounds
//! - DEBUG: per-peer propagation results, duplicate syncs, session teardown

use tracing_subscriber::EnvFilter;

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the tracing subscriber.
///
/// Log level is controlled via `RUST_LOG`, defaulting to `info`.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(filter("info")).init();
}

/// Initialize the tracing subscriber with JSON output.
pub fn init_json() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter("info"))
        .init();
}

/// Pick the output format from `MURAL_LOG_FORMAT` (`json` or text)
pub fn init_from_env() {
    if std::env::var("MURAL_LOG_FORMAT").as_deref() == Ok("json") {
        init_json();
    } else {
        init();
    }
}

/// Initialize the tracing subscriber for tests.
///
/// Safe to call repeatedly.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("debug"))
        .with_test_writer()
        .try_init();
}
