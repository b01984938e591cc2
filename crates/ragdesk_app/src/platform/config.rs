use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use desk_logging::LogDestination;
use log::LevelFilter;
use ragdesk_engine::{ApiSettings, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

/// Terminal client for the document question-answering backend.
#[derive(Debug, Parser)]
#[command(name = "ragdesk", version)]
pub struct Cli {
    /// Backend base address
    #[arg(long, env = "RAGDESK_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,
    /// Where log output goes; the file is ./ragdesk.log
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    /// Minimum log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    /// Write the transcript as HTML to this path on exit
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
    /// Abort requests after this many seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub transcript: Option<PathBuf>,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            api: ApiSettings {
                base_url: cli.api_url,
                request_timeout: cli.timeout_secs.map(Duration::from_secs),
            },
            log_destination: cli.log.into(),
            log_level: cli.log_level.into(),
            transcript: cli.transcript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "ragdesk",
            "--api-url",
            "http://10.0.0.5:9000",
            "--log",
            "both",
            "--log-level",
            "debug",
            "--timeout-secs",
            "30",
            "--transcript",
            "chat.html",
        ])
        .unwrap();
        let config = AppConfig::from(cli);

        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.transcript, Some(PathBuf::from("chat.html")));
    }

    #[test]
    fn no_timeout_unless_asked() {
        let cli = Cli::try_parse_from(["ragdesk"]).unwrap();
        let config = AppConfig::from(cli);

        assert_eq!(config.api.request_timeout, None);
        assert_eq!(config.log_destination, LogDestination::File);
        assert_eq!(config.transcript, None);
    }

    #[test]
    fn unknown_log_target_is_rejected() {
        assert!(Cli::try_parse_from(["ragdesk", "--log", "syslog"]).is_err());
    }
}
