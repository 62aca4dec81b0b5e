//! Model bundle loading and validation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use super::scaler::StandardScaler;
use crate::error_handling::BundleLoadError;
use crate::normalize::{Granularity, HostPolicy};

/// Which side of the threshold a continuous score counts as label 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// `score > threshold` is label 1.
    #[default]
    AboveIsPositive,
    /// `score > threshold` is label 0.
    AboveIsNegative,
}

/// Metadata describing how the model was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preprocessing {
    /// Features transformed with `ln(1 + x)` before scaling.
    pub log1p_features: Vec<String>,
    /// Decision threshold for continuous scores.
    pub threshold: f64,
    pub polarity: Polarity,
    /// Which label means phishing.
    pub phishing_label: u8,
    pub host_policy: HostPolicy,
    pub granularity: Granularity,
    /// Whether the model was trained with page content features.
    pub content_features: bool,
}

impl Default for Preprocessing {
    fn default() -> Self {
        Self {
            log1p_features: Vec::new(),
            threshold: 0.5,
            polarity: Polarity::AboveIsPositive,
            phishing_label: 0,
            host_policy: HostPolicy::Preserve,
            granularity: Granularity::FullUrl,
            content_features: false,
        }
    }
}

/// The trained model and everything needed to feed it.
///
/// Immutable once loaded. Construction always validates, so a `ModelBundle`
/// value is internally consistent: the scaler, the classifier and the
/// feature list agree on dimensionality.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelBundle {
    #[serde(default)]
    version: String,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    #[serde(default)]
    preprocessing: Preprocessing,
    classifier: Classifier,
    #[serde(skip)]
    log1p_mask: Vec<bool>,
}

impl ModelBundle {
    /// Builds and validates a bundle from its parts.
    pub fn new(
        version: impl Into<String>,
        feature_names: Vec<String>,
        scaler: StandardScaler,
        preprocessing: Preprocessing,
        classifier: Classifier,
    ) -> Result<Self, BundleLoadError> {
        Self {
            version: version.into(),
            feature_names,
            scaler,
            preprocessing,
            classifier,
            log1p_mask: Vec::new(),
        }
        .validated()
    }

    /// Reads and validates the bundle file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `BundleLoadError` if the file cannot be read, is not a valid
    /// bundle document or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BundleLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle = Self::from_json(&json)?;
        log::info!(
            "Loaded model bundle {} (version '{}', {} features, {} classifier, content features {})",
            path.display(),
            bundle.version,
            bundle.feature_names.len(),
            bundle.classifier.kind(),
            if bundle.preprocessing.content_features {
                "required"
            } else {
                "not used"
            }
        );
        Ok(bundle)
    }

    /// Parses and validates a bundle document.
    pub fn from_json(json: &str) -> Result<Self, BundleLoadError> {
        let bundle: ModelBundle = serde_json::from_str(json)?;
        bundle.validated()
    }

    fn validated(mut self) -> Result<Self, BundleLoadError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(BundleLoadError::Invalid("feature list is empty".to_string()));
        }
        let mut seen = HashSet::with_capacity(n);
        for name in &self.feature_names {
            if name.trim().is_empty() {
                return Err(BundleLoadError::Invalid("feature list has a blank name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(BundleLoadError::Invalid(format!(
                    "feature '{name}' is declared more than once"
                )));
            }
        }

        self.scaler.validate(n).map_err(BundleLoadError::Invalid)?;
        self.classifier.validate(n).map_err(BundleLoadError::Invalid)?;

        let preprocessing = &self.preprocessing;
        if let Some(name) = preprocessing
            .log1p_features
            .iter()
            .find(|name| !seen.contains(name.as_str()))
        {
            return Err(BundleLoadError::Invalid(format!(
                "log1p feature '{name}' is not in the feature list"
            )));
        }
        if !preprocessing.threshold.is_finite() {
            return Err(BundleLoadError::Invalid("threshold is not finite".to_string()));
        }
        if preprocessing.phishing_label > 1 {
            return Err(BundleLoadError::Invalid(format!(
                "phishing_label must be 0 or 1, got {}",
                preprocessing.phishing_label
            )));
        }

        self.log1p_mask = self
            .feature_names
            .iter()
            .map(|name| preprocessing.log1p_features.contains(name))
            .collect();
        Ok(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Feature names in the order the model consumes them.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn preprocessing(&self) -> &Preprocessing {
        &self.preprocessing
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether the feature at `index` is transformed with `ln(1 + x)`.
    pub fn applies_log1p(&self, index: usize) -> bool {
        self.log1p_mask.get(index).copied().unwrap_or(false)
    }
}
