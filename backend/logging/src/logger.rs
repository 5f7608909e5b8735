//! Structured Logger
//!
//! Wraps `tracing` with a console layer (human-readable or JSON), an optional
//! daily-rotated NDJSON file, and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. When `log_dir` is set, records
/// are also written as NDJSON to `soilcast.log.YYYY-MM-DD` in that directory.
/// Calling this twice is harmless; the second call does nothing.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "soilcast.log");
        fmt::layer().json().with_writer(file_appender).with_ansi(false)
    });

    let json_console = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let plain_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init();
}
