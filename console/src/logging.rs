//! Structured logging initialization.
//!
//! Configures the tracing subscriber for structured logging output. Logs go
//! to stderr so they never interleave with the console's own output on
//! stdout. The RUST_LOG environment variable takes precedence over
//! configuration file settings.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging subsystem.
///
/// The RUST_LOG environment variable takes precedence over the configuration
/// file level setting. If RUST_LOG is not set, the level from config is used.
pub fn init(config: &LoggingConfig) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.as_str())
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.target);

    match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_ansi(true));
            subscriber.init();
        }
        (LogFormat::Pretty, false) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_ansi(true).without_time());
            subscriber.init();
        }
        (LogFormat::Json, true) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.json());
            subscriber.init();
        }
        (LogFormat::Json, false) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.json().without_time());
            subscriber.init();
        }
        (LogFormat::Compact, true) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact().with_ansi(true));
            subscriber.init();
        }
        (LogFormat::Compact, false) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact().with_ansi(true).without_time());
            subscriber.init();
        }
    }
}
