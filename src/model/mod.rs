//! Model bundle.
//!
//! This module provides:
//! - [`ModelBundle`]: the feature schema, scaler, classifier and
//!   preprocessing metadata, loaded once from a JSON file and validated
//! - The classifier kinds a bundle may carry (logistic, MLP, decision tree)
//!
//! Every other part of the crate reads the model through [`ModelBundle`]; the
//! file layout is known only here.

mod bundle;
mod classifier;
mod scaler;

// Re-export public API
pub use bundle::{ModelBundle, Polarity, Preprocessing};
pub use classifier::{Activation, Classifier, DenseLayer, Score, TreeNode};
pub use scaler::StandardScaler;
