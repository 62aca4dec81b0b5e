//! Per-feature standardization persisted with the bundle.

use serde::{Deserialize, Serialize};

use crate::error_handling::PredictError;

/// Affine transform `(value - mean) / scale`, one pair per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Identity transform over `dim` features.
    pub fn identity(dim: usize) -> Self {
        Self::new(vec![0.0; dim], vec![1.0; dim])
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Checks the scaler against the declared feature count.
    pub(crate) fn validate(&self, expected_dim: usize) -> Result<(), String> {
        if self.mean.len() != expected_dim || self.scale.len() != expected_dim {
            return Err(format!(
                "scaler has {} means and {} scales, expected {} each",
                self.mean.len(),
                self.scale.len(),
                expected_dim
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("scaler mean[{i}] is not finite"));
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!("scaler scale[{i}] must be finite and non-zero"));
        }
        Ok(())
    }

    /// Scales `values` in place.
    ///
    /// # Errors
    ///
    /// `PredictError::Inference` on a dimension mismatch or when any scaled
    /// value is not finite.
    pub fn transform_in_place(&self, values: &mut [f64]) -> Result<(), PredictError> {
        if values.len() != self.dim() {
            return Err(PredictError::Inference(format!(
                "vector has {} values, scaler expects {}",
                values.len(),
                self.dim()
            )));
        }
        for (i, value) in values.iter_mut().enumerate() {
            *value = (*value - self.mean[i]) / self.scale[i];
            if !value.is_finite() {
                return Err(PredictError::Inference(format!(
                    "scaled value at index {i} is not finite"
                )));
            }
        }
        Ok(())
    }
}
