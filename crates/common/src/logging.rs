//! Logging and tracing initialization.
//!
//! Logs go to stderr; stdout carries the per-frame labels printed by the CLI.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const FALLBACK_LEVEL: &str = "info";

/// Parse a filter such as `"debug"` or `"emofeed_face_tracker=debug,warn"`.
pub fn parse_filter(level: &str) -> Result<EnvFilter, ParseError> {
    EnvFilter::builder().parse(level)
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// An unparsable configured level falls back to `info` and is reported once
/// the subscriber is up. Returns `false` if a subscriber was already set.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let mut rejected = None;
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.level).unwrap_or_else(|e| {
            rejected = Some(e);
            EnvFilter::new(FALLBACK_LEVEL)
        }),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.with_target(true).try_init().is_ok()
    };

    if let Some(e) = rejected {
        tracing::warn!(level = %config.level, error = %e, "Invalid log level, using {FALLBACK_LEVEL}");
    }
    installed
}
