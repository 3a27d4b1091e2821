//! Logger bootstrap.
//!
//! Library code logs through the `log` facade; the binary installs a
//! `tracing` fmt subscriber and bridges `log` records into it.

use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Errors raised while installing the global logger.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// A `log` logger was already installed.
    #[error("failed to install the log bridge: {0}")]
    LogBridge(#[from] log::SetLoggerError),
    /// A global `tracing` subscriber was already installed.
    #[error("failed to install the tracing subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Builds the env filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Can only succeed once per process.
pub fn init() -> Result<(), LoggerError> {
    LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
