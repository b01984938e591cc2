#![deny(missing_docs)]
//! Shared logging utilities for the RagDesk workspace.
//!
//! This crate provides the `desk_*` logging macros used across the codebase,
//! the logger initialisation used by the binary and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Once;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./ragdesk.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! desk_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! desk_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! desk_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! desk_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! desk_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to the log file only.
    #[default]
    File,
    /// Write to the terminal (stderr for warnings and errors, stdout otherwise).
    Terminal,
    /// Write to both the log file and the terminal.
    Both,
    /// Install no logger at all.
    Off,
}

/// Initialize the global logger.
///
/// File destinations write to [`DEFAULT_LOG_FILE`]. Returns the path of the
/// log file when one was created, so the caller can mention it to the user.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> Option<PathBuf> {
    initialize_with_file(destination, level, Path::new(DEFAULT_LOG_FILE))
}

/// Same as [`initialize`] but with an explicit log file path.
pub fn initialize_with_file(
    destination: LogDestination,
    level: LevelFilter,
    log_path: &Path,
) -> Option<PathBuf> {
    let config = build_config();
    let mut file_used = None;

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::Off => return None,
        LogDestination::File => match create_file_logger(level, config, log_path) {
            Some(file_logger) => {
                file_used = Some(log_path.to_path_buf());
                vec![file_logger]
            }
            None => return None,
        },
        LogDestination::Terminal => vec![term_logger(level, config)],
        LogDestination::Both => {
            let mut loggers = vec![term_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config, log_path) {
                file_used = Some(log_path.to_path_buf());
                loggers.push(file_logger);
            }
            loggers
        }
    };

    // A second initialisation is a no-op, the first logger stays installed.
    let _ = CombinedLogger::init(loggers);
    file_used
}

/// Initializes a simple terminal logger for use in tests.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Use debug level in debug builds, info in release builds.
        let level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let _ = CombinedLogger::init(vec![term_logger(level, Config::default())]);
    });
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn term_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    let logger: Box<dyn SharedLogger> =
        TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto);
    logger
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<dyn SharedLogger>> {
    match File::create(log_path) {
        Ok(file) => {
            let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
            Some(logger)
        }
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
