//! # Logging
//!
//! Verbosity-driven `tracing` setup for the plugin binary. Diagnostics go to
//! stderr so stdout carries only the plugin status line.

use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Map the `-v` count to a log level
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initialize logging once per process; `RUST_LOG` takes precedence over verbosity
pub fn init_logging(verbosity: u8) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level_for_verbosity(verbosity).into())
            .from_env_lossy();

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();

        // A subscriber may already be installed by a test harness
        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}
