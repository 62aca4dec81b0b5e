//! Prediction service.
//!
//! Holds the loaded [`ModelBundle`] and turns feature records into verdicts.
//! The bundle is shared read-only behind an `Arc`; a service can be cloned
//! freely and used from any number of tasks.

use std::sync::Arc;

use serde::Serialize;

use crate::assemble::assemble_vector;
use crate::error_handling::PredictError;
use crate::features::FeatureRecord;
use crate::model::{ModelBundle, Polarity, Score};

/// A binary verdict and, for continuous classifiers, the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PredictionService {
    bundle: Arc<ModelBundle>,
}

impl PredictionService {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &Arc<ModelBundle> {
        &self.bundle
    }

    /// Assembles, scales and scores `record`.
    ///
    /// # Errors
    ///
    /// `PredictError::SchemaMismatch` if the record does not cover the
    /// bundle's features, `PredictError::Inference` if scoring fails.
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictError> {
        let vector = assemble_vector(record, &self.bundle)?;
        self.predict_vector(&vector)
    }

    /// Scores an already assembled and scaled vector.
    pub fn predict_vector(&self, vector: &[f64]) -> Result<PredictionResult, PredictError> {
        let result = match self.bundle.classifier().score(vector)? {
            Score::Continuous(score) => PredictionResult {
                label: self.label_for(score),
                score: Some(score),
            },
            Score::Label(label) => PredictionResult { label, score: None },
        };
        log::trace!("Prediction {:?}", result);
        Ok(result)
    }

    fn label_for(&self, score: f64) -> u8 {
        let preprocessing = self.bundle.preprocessing();
        let above = score > preprocessing.threshold;
        match preprocessing.polarity {
            Polarity::AboveIsPositive => u8::from(above),
            Polarity::AboveIsNegative => u8::from(!above),
        }
    }

    /// Whether `result` means phishing under the bundle's label convention.
    pub fn is_phishing(&self, result: &PredictionResult) -> bool {
        result.label == self.bundle.preprocessing().phishing_label
    }
}
