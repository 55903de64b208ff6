//! Log file setup.
//!
//! The interactive screen owns stdout and stderr, so events are only recorded
//! when `DIRCMP_LOG` names a file to append to. `RUST_LOG` picks the filter.

use anyhow::{Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "DIRCMP_LOG";

/// Filter used when `RUST_LOG` is unset or invalid.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose { "dircmp=debug" } else { "dircmp=info" }
}

/// Installs a file subscriber if `DIRCMP_LOG` is set. Returns whether one was
/// installed.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber is
/// already set.
pub fn init(verbose: bool) -> Result<bool> {
    match env::var_os(LOG_ENV) {
        Some(path) if !path.is_empty() => {
            init_file(Path::new(&path), verbose)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn init_file(path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to install log subscriber")?;

    info!(version = crate::VERSION, "Logging started");
    Ok(())
}
