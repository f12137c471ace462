//! # Logging configuration
//!
//! Sets up the tracing subscriber for the gateway process.

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system.
///
/// `RUST_LOG` overrides the computed filter when set.
pub fn init_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", std::string::String::as_str);

    let default_filter = format!("{level},auth_gate=debug");
    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Sanitize a token for log output.
#[must_use]
pub fn sanitize_token(token: &str) -> String {
    if token.len() > 20 {
        format!("{}***{}", &token[..8], &token[token.len() - 8..])
    } else if token.len() > 8 {
        format!("{}***", &token[..4])
    } else {
        "***".to_string()
    }
}
