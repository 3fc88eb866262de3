//! Environment-based tracing setup, shared by the CLI binary and any
//! integration test that wants readable output instead of the default
//! swallowed `tracing` events.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The log level can be configured via environment variables:
/// - `RUST_LOG`: standard `tracing` filter syntax (e.g. "debug", "info,power_dispatch=trace")
/// - `DISPATCH_LOG`: dispatch-specific override, takes precedence over `RUST_LOG`
///
/// Examples:
/// - `DISPATCH_LOG=debug` - every broker handler's debug trace
/// - `DISPATCH_LOG=info` - initial solve + cancellation warnings only (default)
/// - `DISPATCH_LOG=power_dispatch::broker=trace` - trace just the protocol engine
pub fn init_logging() {
    let _ = dotenv::dotenv();

    let filter = match env::var("DISPATCH_LOG") {
        Ok(value) => value,
        Err(_) => env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
    };

    let env_filter = EnvFilter::try_new(&filter)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!(log_filter = %filter, "logging initialized");
}
