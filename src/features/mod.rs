//! Feature extraction from URL text.
//!
//! This module provides:
//! - [`FeatureRecord`], the name to value mapping every extractor produces
//! - The lexical extractor and its helpers (TLD table, obfuscation patterns)
//!
//! Content features computed from the fetched page live in [`crate::content`].

mod lexical;
mod obfuscation;
mod record;
mod tld;

// Re-export public API
pub use lexical::{extract_lexical_features, LEXICAL_FEATURES};
pub use obfuscation::count_obfuscation;
pub use record::{round_feature, FeatureRecord, FeatureValue};
pub use tld::{tld_legitimate_prob, tld_of, UNKNOWN_TLD_PROBABILITY};
