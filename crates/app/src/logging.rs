//! Structured logging configuration for the doodle pad engine.
//!
//! Uses `tracing` with `tracing-subscriber`. Logs always go to stderr;
//! stdout carries the IPC channel.
//!
//! ## Environment Variables
//!
//! - `DOODLE_LOG` or `RUST_LOG`: Set log level (e.g., `debug`, `painting=debug,info`)
//! - `DOODLE_LOG_FORMAT`: Set output format (`pretty`, `compact`, `json`)
//! - `DOODLE_LOG_FILE_LINE`: `1`/`true`/`yes` adds source file and line to each event

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "doodle_pad=info,painting=info,warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable with colors and indentation
    #[default]
    Pretty,
    /// Compact single-line output
    Compact,
    /// JSON output for log aggregation
    Json,
}

impl LogFormat {
    /// Parse from string (case-insensitive); unknown values are pretty
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log filter directive (e.g., "debug", "painting=debug,warn")
    pub filter: String,
    /// Output format
    pub format: LogFormat,
    /// Include file/line in logs
    pub with_file: bool,
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup("DOODLE_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = lookup("DOODLE_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or_default();

        let with_file = lookup("DOODLE_LOG_FILE_LINE")
            .is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            filter,
            format,
            with_file,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Subsequent calls are ignored.
pub fn init(config: LogConfig) {
    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match config.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file),
            );
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file),
            );
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(config.with_file)
                    .with_line_number(config.with_file),
            );
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn test_config_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.with_file);
    }

    #[test]
    fn test_file_line_flag() {
        let on = LogConfig::from_lookup(|key| (key == "DOODLE_LOG_FILE_LINE").then(|| "TRUE".to_string()));
        assert!(on.with_file);

        let off = LogConfig::from_lookup(|key| (key == "DOODLE_LOG_FILE_LINE").then(|| "0".to_string()));
        assert!(!off.with_file);
    }

    #[test]
    fn test_config_prefers_doodle_log() {
        let vars: HashMap<&str, &str> = [
            ("DOODLE_LOG", "painting=debug"),
            ("RUST_LOG", "trace"),
            ("DOODLE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let config = LogConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.filter, "painting=debug");
        assert_eq!(config.format, LogFormat::Json);
    }
}
