//! Process-wide `tracing` subscriber for the pocket package store.
//!
//! Libraries in this workspace only emit events through `tracing`; the hosting
//! binary calls [`init`] once at startup to decide where they go.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use pocket_config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Build the event filter.
///
/// `RUST_LOG` wins when it is set, so a single run can be made more verbose
/// without touching the configuration file.
pub fn filter(config: &LogConfig) -> Result<EnvFilter> {
    if let Ok(directives) = std::env::var(EnvFilter::DEFAULT_ENV) {
        return EnvFilter::try_new(&directives).or_raise(|| ErrorKind::Filter(directives.clone()));
    }
    let level = config
        .level_filter()
        .map_err(|err| err.raise(ErrorKind::Filter(config.level.clone())))?;
    Ok(EnvFilter::new(level.to_string()))
}

/// Install the global subscriber. Can only succeed once per process.
pub fn init(config: &LogConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_target(true)
        .try_init()
        .map_err(|_| ErrorKind::AlreadyInstalled)?;
    tracing::debug!(level = %config.level, "logger initialized");
    Ok(())
}
