//! Error type definitions.
//!
//! This module defines the error types of every pipeline stage and the stable
//! category names used when logging them.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors raised while loading and validating a model bundle.
///
/// All of them are fatal: a process must not serve with a bundle that failed
/// to load.
#[derive(Error, Debug)]
pub enum BundleLoadError {
    /// The bundle file could not be read.
    #[error("Failed to read model bundle {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bundle is not valid JSON or does not match the bundle layout.
    #[error("Failed to parse model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bundle parsed but its parts are inconsistent.
    #[error("Invalid model bundle: {0}")]
    Invalid(String),
}

/// Errors surfaced to the caller of a prediction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// The request is missing its `url` or the value is unusable.
    #[error("Invalid request: {0}")]
    Input(String),

    /// A feature the bundle declares is absent from the extracted record, or
    /// is not numeric.
    #[error("Feature schema mismatch for '{feature}': {reason}")]
    SchemaMismatch { feature: String, reason: String },

    /// Two extractors produced the same feature name.
    #[error("Feature '{0}' was produced by more than one extractor")]
    DuplicateFeature(String),

    /// Scaling or classifier scoring failed.
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// Stable category name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Input(_) => "input_error",
            PredictError::SchemaMismatch { .. } | PredictError::DuplicateFeature(_) => {
                "schema_mismatch"
            }
            PredictError::Inference(_) => "inference_failure",
        }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::Input(_))
    }

    /// Message safe to hand to a caller.
    ///
    /// Input errors carry messages written by this crate; everything else is
    /// replaced by a fixed description so internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            PredictError::Input(message) => message.clone(),
            PredictError::SchemaMismatch { .. } | PredictError::DuplicateFeature(_) => {
                "Feature schema mismatch between extractor and model bundle".to_string()
            }
            PredictError::Inference(_) => "Model inference failed".to_string(),
        }
    }
}

/// Reasons a content fetch did not produce a usable HTML document.
///
/// Every variant is recovered inside the content extractor by substituting
/// the default content vector.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("URL cannot be fetched: {0}")]
    InvalidUrl(String),

    #[error("Refusing to fetch non-public target: {0}")]
    UnsafeTarget(String),

    #[error("Content fetch timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Redirect handling failed: {0}")]
    Redirect(String),

    #[error("Non-success status: {0}")]
    Status(u16),

    #[error("Response is not HTML (content-type: {0})")]
    NotHtml(String),

    #[error("Response body exceeds {0} bytes")]
    TooLarge(usize),

    #[error("Response body is not valid UTF-8")]
    Decode,

    #[error("Request failed: {0}")]
    Request(String),
}

/// Category of a [`FetchError`], used for log lines and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FetchFailureKind {
    InvalidUrl,
    UnsafeTarget,
    Timeout,
    Connect,
    Redirect,
    Status,
    NotHtml,
    TooLarge,
    Decode,
    Request,
}

impl FetchError {
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            FetchError::InvalidUrl(_) => FetchFailureKind::InvalidUrl,
            FetchError::UnsafeTarget(_) => FetchFailureKind::UnsafeTarget,
            FetchError::Timeout => FetchFailureKind::Timeout,
            FetchError::Connect(_) => FetchFailureKind::Connect,
            FetchError::Redirect(_) => FetchFailureKind::Redirect,
            FetchError::Status(_) => FetchFailureKind::Status,
            FetchError::NotHtml(_) => FetchFailureKind::NotHtml,
            FetchError::TooLarge(_) => FetchFailureKind::TooLarge,
            FetchError::Decode => FetchFailureKind::Decode,
            FetchError::Request(_) => FetchFailureKind::Request,
        }
    }
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchFailureKind::InvalidUrl => "invalid URL",
            FetchFailureKind::UnsafeTarget => "unsafe target",
            FetchFailureKind::Timeout => "timeout",
            FetchFailureKind::Connect => "connection error",
            FetchFailureKind::Redirect => "redirect error",
            FetchFailureKind::Status => "non-success status",
            FetchFailureKind::NotHtml => "non-HTML content",
            FetchFailureKind::TooLarge => "body too large",
            FetchFailureKind::Decode => "decode error",
            FetchFailureKind::Request => "request error",
        }
    }
}
