//! File logging setup.
//!
//! The TUI owns the terminal, so logs never go to stdout/stderr. Events are
//! written through a non-blocking appender to `$EVM_HOME/logs/evm.log`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::paths;

/// Log file name inside the logs directory.
pub const LOG_FILE_NAME: &str = "evm.log";

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "EVM_LOG";

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive for the lifetime of the process; dropping it
/// flushes and stops the background writer.
pub fn init(default_level: &str) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), default_level)
}

/// Installs the global subscriber writing into `dir`.
pub fn init_in(dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), default_level);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Picks the env directive when valid, else the configured level, else `info`.
fn build_filter(env_directive: Option<&str>, default_level: &str) -> EnvFilter {
    env_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
