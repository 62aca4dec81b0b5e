//! phishguard library: URL phishing classification
//!
//! This library turns a raw, possibly malformed URL into a phishing or
//! legitimate verdict. It normalizes the URL, computes lexical features from
//! the URL text and (when the model was trained with them) content features
//! from the fetched page, assembles them in the order the model bundle
//! declares, scales them and scores them with the bundled classifier.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use phishguard::{Config, Detector, ModelBundle};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = Arc::new(ModelBundle::load("phishing_model_bundle.json")?);
//! let detector = Detector::new(bundle, &Config::default())?;
//!
//! let result = detector.predict_url("secure-paypal-login.com//update").await?;
//! println!(
//!     "label {} ({})",
//!     result.label,
//!     if detector.is_phishing(&result) { "phishing" } else { "legitimate" }
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Content features are fetched with `reqwest`, so prediction requires a Tokio
//! runtime.

pub mod assemble;
pub mod config;
pub mod content;
pub mod detector;
pub mod error_handling;
pub mod features;
pub mod initialization;
pub mod model;
pub mod normalize;
pub mod predict;
pub mod request;
mod run;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use content::ContentExtractor;
pub use detector::Detector;
pub use error_handling::{BundleLoadError, FetchError, InitializationError, PredictError};
pub use features::FeatureRecord;
pub use model::ModelBundle;
pub use normalize::{normalize_url, Granularity, HostPolicy, NormalizedUrl};
pub use predict::{PredictionResult, PredictionService};
pub use request::{PredictRequest, PredictResponse};
pub use run::{classify_input, classify_stream, parse_input_line, run_classification, ClassifiedInput, RunReport};
