//! Node configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Node configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LEDGER_LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `LEDGER_GENESIS`: path to a genesis JSON document (default: none)
/// - `LEDGER_OWNER`: store owner when no genesis file is given (default: `"owner"`)
/// - `LEDGER_STORE_NAME`: store name when no genesis file is given (default: `"Bileto"`)
/// - `LEDGER_METRICS_DUMP`: print Prometheus metrics to stderr at exit (default: off)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub genesis_path: Option<PathBuf>,
    pub owner: String,
    pub store_name: String,
    pub metrics_dump: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LEDGER_LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            genesis_path: lookup("LEDGER_GENESIS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            owner: lookup("LEDGER_OWNER").unwrap_or(defaults.owner),
            store_name: lookup("LEDGER_STORE_NAME").unwrap_or(defaults.store_name),
            metrics_dump: lookup("LEDGER_METRICS_DUMP")
                .map(|v| is_enabled(&v))
                .unwrap_or(defaults.metrics_dump),
        }
    }
}

fn is_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            genesis_path: None,
            owner: "owner".to_string(),
            store_name: "Bileto".to_string(),
            metrics_dump: false,
        }
    }
}
