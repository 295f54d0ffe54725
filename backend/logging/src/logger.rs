//! Structured logger.
//!
//! Wraps `tracing` with a console layer and, when a log directory is
//! configured, a JSON NDJSON file with daily rotation. The level comes
//! from `RUST_LOG` when set, otherwise from the configured default.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global logger. Safe to call more than once; later calls
/// are no-ops.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    match log_dir {
        Some(dir) => {
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, dir, "snapgrade.log");
            let file_layer = fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_ansi(false);

            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init();
        }
    }
}
