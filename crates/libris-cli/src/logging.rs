//! Diagnostic logging
//!
//! Logs go to a file so they never interleave with the interactive menu.

use std::fs::OpenOptions;

use libris_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "LIBRIS_LOG";

/// Initialize logging
///
/// Only initializes if LIBRIS_LOG is set.
/// Logs to file (config.log_file or default {data_dir}/libris.log).
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(filter_directive(&log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

fn filter_directive(level: &str) -> String {
    let level = if level.trim().is_empty() { "info" } else { level.trim() };
    format!("libris_core={},libris_cli={}", level, level)
}
