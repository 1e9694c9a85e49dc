//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for command output. `RUST_LOG`
//! takes precedence over the configured level.

use crate::constants::LOG_FORMAT_JSON;
use crate::errors::{AppError, AppResult};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Builds the level filter: `RUST_LOG` if set, otherwise `level`.
///
/// # Errors
///
/// Returns `AppError::Config` if `level` is not a valid filter directive.
pub fn env_filter(level: &str) -> AppResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| AppError::Config(format!("Invalid log level '{}': {}", level, e))),
    }
}

/// Installs the global subscriber.
///
/// `format` is `json` for one JSON object per event (with the current span
/// list), anything else for human-readable text.
///
/// # Errors
///
/// Returns `AppError::Config` if the level is invalid or a global
/// subscriber was already installed.
pub fn init_tracing(format: &str, level: &str) -> AppResult<()> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if format == LOG_FORMAT_JSON {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}
