//! Feature vector assembly.
//!
//! Orders a merged [`FeatureRecord`] by the bundle's declared feature list,
//! then applies the declared `ln(1 + x)` subset and the persisted scaler.

use crate::error_handling::PredictError;
use crate::features::{FeatureRecord, FeatureValue};
use crate::model::ModelBundle;

/// Builds the scaled input vector for `bundle` from `record`.
///
/// Features in `record` that the bundle does not declare are ignored.
///
/// # Errors
///
/// - `PredictError::SchemaMismatch` when a declared feature is missing or is
///   text. Missing features are never zero-filled.
/// - `PredictError::Inference` when a transformed or scaled value is not
///   finite.
pub fn assemble_vector(record: &FeatureRecord, bundle: &ModelBundle) -> Result<Vec<f64>, PredictError> {
    let mut vector = Vec::with_capacity(bundle.feature_names().len());
    for (index, name) in bundle.feature_names().iter().enumerate() {
        let raw = match record.get(name) {
            Some(FeatureValue::Number(value)) => *value,
            Some(FeatureValue::Text(_)) => {
                return Err(PredictError::SchemaMismatch {
                    feature: name.clone(),
                    reason: "declared numeric but extracted as text".to_string(),
                })
            }
            None => {
                return Err(PredictError::SchemaMismatch {
                    feature: name.clone(),
                    reason: "missing from extracted features".to_string(),
                })
            }
        };

        let value = if bundle.applies_log1p(index) {
            raw.ln_1p()
        } else {
            raw
        };
        if !value.is_finite() {
            return Err(PredictError::Inference(format!(
                "ln(1 + x) of '{name}' = {raw} is not finite"
            )));
        }
        vector.push(value);
    }

    bundle.scaler().transform_in_place(&mut vector)?;
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ModelBundle {
        ModelBundle::from_json(
            r#"{
                "feature_names": ["NoOfJS", "IsHTTPS", "URLLength"],
                "scaler": { "mean": [0.0, 0.5, 10.0], "scale": [1.0, 0.5, 2.0] },
                "preprocessing": { "log1p_features": ["NoOfJS"] },
                "classifier": { "type": "logistic", "weights": [1.0, 1.0, 1.0], "bias": 0.0 }
            }"#,
        )
        .expect("valid bundle")
    }

    #[test]
    fn test_orders_transforms_and_scales() {
        let mut record = FeatureRecord::new();
        record.insert_count("URLLength", 14);
        record.insert_count("NoOfJS", 0);
        record.insert_flag("IsHTTPS", true);
        record.insert_text("Title", "ignored");
        record.insert_count("Undeclared", 99);

        let vector = assemble_vector(&record, &bundle()).expect("assembles");
        assert_eq!(vector, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_log1p_subset() {
        let mut record = FeatureRecord::new();
        record.insert_count("URLLength", 10);
        record.insert_number("NoOfJS", std::f64::consts::E - 1.0);
        record.insert_flag("IsHTTPS", false);

        let vector = assemble_vector(&record, &bundle()).expect("assembles");
        assert!((vector[0] - 1.0).abs() < 1e-6);
        assert_eq!(vector[1], -1.0);
        assert_eq!(vector[2], 0.0);
    }

    #[test]
    fn test_missing_feature_is_schema_mismatch() {
        let mut record = FeatureRecord::new();
        record.insert_count("URLLength", 10);
        record.insert_flag("IsHTTPS", false);

        let err = assemble_vector(&record, &bundle()).expect_err("NoOfJS missing");
        assert_eq!(
            err,
            PredictError::SchemaMismatch {
                feature: "NoOfJS".into(),
                reason: "missing from extracted features".into()
            }
        );
    }

    #[test]
    fn test_text_feature_is_schema_mismatch() {
        let mut record = FeatureRecord::new();
        record.insert_text("NoOfJS", "3");
        record.insert_count("URLLength", 10);
        record.insert_flag("IsHTTPS", false);

        let err = assemble_vector(&record, &bundle()).expect_err("text value");
        assert_eq!(err.kind(), "schema_mismatch");
    }

    #[test]
    fn test_log1p_below_minus_one_is_inference_failure() {
        let mut record = FeatureRecord::new();
        record.insert_number("NoOfJS", -1.0);
        record.insert_count("URLLength", 10);
        record.insert_flag("IsHTTPS", false);

        let err = assemble_vector(&record, &bundle()).expect_err("ln(0)");
        assert_eq!(err.kind(), "inference_failure");
    }
}
