//! Centralized logging system
//!
//! Console output plus optional rolling files in the configured directory,
//! separated by log type:
//! - <dir>/main   - All logs, JSON
//! - <dir>/error  - Error and warning logs only
//! - <dir>/ws     - WebSocket and exchange logs
//! - <dir>/signal - Arbitrage ratio logs

use crate::infrastructure::config::LoggingConfig;
use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_TYPES: [&str; 4] = ["main", "error", "ws", "signal"];

/// Initialize logging
///
/// RUST_LOG takes precedence over `config.level`.
/// Returned guards must be kept alive for the duration of the program,
/// dropping them flushes and stops the file writers.
pub fn init_logging(config: &LoggingConfig) -> io::Result<Vec<WorkerGuard>> {
    let mut guards = Vec::new();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    let (main_layer, error_layer, ws_layer, signal_layer) = if config.files {
        create_log_dirs(&config.dir)?;

        let (main_appender, main_guard) = create_appender(&config.dir, "main");
        let (error_appender, error_guard) = create_appender(&config.dir, "error");
        let (ws_appender, ws_guard) = create_appender(&config.dir, "ws");
        let (signal_appender, signal_guard) = create_appender(&config.dir, "signal");
        guards.extend([main_guard, error_guard, ws_guard, signal_guard]);

        let main_layer = tracing_subscriber::fmt::layer()
            .with_writer(main_appender)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .json();

        let error_layer = tracing_subscriber::fmt::layer()
            .with_writer(error_appender)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_filter(LevelFilter::WARN);

        let ws_layer = tracing_subscriber::fmt::layer()
            .with_writer(ws_appender)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_filter(filter_fn(|metadata| {
                let target = metadata.target();
                target.starts_with("ws") || target.contains("exchange") || target.contains("binance")
            }));

        let signal_layer = tracing_subscriber::fmt::layer()
            .with_writer(signal_appender)
            .with_ansi(false)
            .with_target(false)
            .with_level(true)
            .with_filter(filter_fn(|metadata| metadata.target() == "signal"));

        (
            Some(main_layer),
            Some(error_layer),
            Some(ws_layer),
            Some(signal_layer),
        )
    } else {
        (None, None, None, None)
    };

    // try_init so tests or embedders that already installed a subscriber keep theirs
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .with(error_layer)
        .with(ws_layer)
        .with(signal_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            files = config.files,
            dir = %config.dir.display(),
            "Logging system initialized"
        );
    }

    Ok(guards)
}

/// Create the log directory and one subdirectory per log type
fn create_log_dirs(dir: &Path) -> io::Result<()> {
    for log_type in LOG_TYPES {
        fs::create_dir_all(dir.join(log_type))?;
    }
    Ok(())
}

/// Create a daily rolling file appender
fn create_appender(dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir.join(name), name);
    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_ws {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "ws", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_api {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "api", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_exchange {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "exchange", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_signal {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "signal", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_main {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "main", $level, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_creation() {
        let test_dir = std::env::temp_dir().join(format!("tri_arb_logs_{}", std::process::id()));
        fs::remove_dir_all(&test_dir).ok();

        create_log_dirs(&test_dir).unwrap();
        for log_type in LOG_TYPES {
            assert!(test_dir.join(log_type).is_dir());
        }
        // Idempotent
        create_log_dirs(&test_dir).unwrap();

        fs::remove_dir_all(&test_dir).ok();
    }

    #[test]
    fn test_init_without_files() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            files: false,
            dir: "unused".into(),
        };
        let guards = init_logging(&config).unwrap();
        assert!(guards.is_empty());

        // A second call must not fail even though a subscriber is installed
        assert!(init_logging(&config).is_ok());
    }
}
