//! Logging setup
//!
//! Logs go to the configured log file, or stderr when none is set.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use docket_core::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber (ignored if one is already set)
pub fn init(config: &Config, verbose: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_ansi(false);

    match &config.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = builder.with_writer(Mutex::new(file)).try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                let _ = builder.with_writer(io::stderr).try_init();
            }
        },
        None => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
    }

    debug!("Logging initialized");
}

fn filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "warn" };
    EnvFilter::new(format!("docket_core={},docket_cli={}", level, level))
}
