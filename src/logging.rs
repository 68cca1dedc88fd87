use crate::config::LoggingConfig;
use std::fs;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the file writer alive. Buffered log lines are flushed when this is
/// dropped, so hold it until the run ends.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber: console output always, plus daily-rolling
/// JSON files when `config.log_dir` is set.
///
/// `RUST_LOG` takes precedence over `config.directive`. If the log directory
/// cannot be created, logging falls back to the console and a warning says so.
pub fn init_logging(config: &LoggingConfig) -> LogGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.directive));

    let (dir, dir_error) = match log_dir(config) {
        Ok(dir) => (dir, None),
        Err(e) => (None, Some(e)),
    };

    let (file_layer, guard) = match dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(e) = dir_error {
        warn!(
            log_dir = ?config.log_dir,
            "File logging disabled, cannot create the log directory: {}", e
        );
    }

    LogGuard { _file: guard }
}

/// The configured log directory, created if missing.
fn log_dir(config: &LoggingConfig) -> std::io::Result<Option<&Path>> {
    match config.log_dir.as_deref() {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            Ok(Some(dir))
        }
        None => Ok(None),
    }
}
