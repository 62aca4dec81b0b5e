//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    BUNDLE_PATH_ENV, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Runtime configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// by library users via `Default`.
///
/// # Examples
///
/// ```no_run
/// use phishguard::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     bundle: PathBuf::from("model.json"),
///     offline: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "phishguard",
    version,
    about = "Classify URLs as phishing or legitimate with a pre-trained model bundle"
)]
pub struct Config {
    /// URLs to classify. Reads one URL or JSON request per line from stdin when empty or "-"
    pub urls: Vec<String>,

    /// Model bundle (JSON) to load at startup
    #[arg(
        long,
        env = BUNDLE_PATH_ENV,
        default_value = "phishing_model_bundle.json"
    )]
    pub bundle: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Content fetch timeout in seconds (whole request, including body)
    #[arg(long = "timeout-seconds", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value for content fetches
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Never fetch page content; content features take their default values
    #[arg(long)]
    pub offline: bool,

    /// Allow content fetches to loopback, private and link-local addresses
    #[arg(long)]
    pub allow_private_hosts: bool,

    /// Maximum number of inputs classified concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,
}

impl Config {
    /// Content fetch timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            bundle: PathBuf::from("phishing_model_bundle.json"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            offline: false,
            allow_private_hosts: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
