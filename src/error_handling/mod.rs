//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every pipeline stage
//! - Categorization of transport errors into enumerated fetch failures
//!
//! Errors fall into two groups:
//! - **Recovered**: [`FetchError`] never leaves the content extractor; the
//!   extractor substitutes its default vector.
//! - **Surfaced**: [`PredictError`] reaches the caller as a structured payload,
//!   [`BundleLoadError`] and [`InitializationError`] stop the process.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{BundleLoadError, FetchError, FetchFailureKind, InitializationError, PredictError};
