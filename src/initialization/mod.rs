//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared process resources:
//! - Logger
//! - HTTP client for content fetches
//!
//! The model bundle has its own loader in [`crate::model::ModelBundle::load`].

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
