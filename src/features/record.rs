//! Feature records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::FEATURE_ROUND_DIGITS;
use crate::error_handling::PredictError;

/// A single extracted feature value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Rounds a feature to `FEATURE_ROUND_DIGITS` decimal digits.
pub fn round_feature(value: f64) -> f64 {
    let factor = 10f64.powi(FEATURE_ROUND_DIGITS);
    (value * factor).round() / factor
}

/// Ratio guarded against an empty denominator.
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Feature name to value mapping produced by the extractors.
///
/// Backed by a `BTreeMap` so iteration and serialization order are stable.
/// Numbers are rounded on insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a numeric feature, rounded. Replaces any previous value.
    pub fn insert_number(&mut self, name: &str, value: f64) {
        self.values
            .insert(name.to_string(), FeatureValue::Number(round_feature(value)));
    }

    pub fn insert_count(&mut self, name: &str, count: usize) {
        self.insert_number(name, count as f64);
    }

    pub fn insert_flag(&mut self, name: &str, flag: bool) {
        self.insert_number(name, if flag { 1.0 } else { 0.0 });
    }

    pub fn insert_text(&mut self, name: &str, text: impl Into<String>) {
        self.values
            .insert(name.to_string(), FeatureValue::Text(text.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Numeric value of `name`, `None` when absent or text.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FeatureValue::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Moves every feature of `other` into `self`.
    ///
    /// # Errors
    ///
    /// `PredictError::DuplicateFeature` if both records carry the same name.
    /// `self` is left unchanged in that case.
    pub fn merge(&mut self, other: FeatureRecord) -> Result<(), PredictError> {
        if let Some(name) = other.names().find(|name| self.contains(name)) {
            return Err(PredictError::DuplicateFeature(name.to_string()));
        }
        self.values.extend(other.values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_feature_six_digits() {
        assert_eq!(round_feature(1.0 / 3.0), 0.333333);
        assert_eq!(round_feature(2.0 / 3.0), 0.666667);
        assert_eq!(round_feature(5.0), 5.0);
        assert_eq!(round_feature(0.0), 0.0);
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn test_insert_helpers() {
        let mut record = FeatureRecord::new();
        record.insert_count("NoOfJS", 3);
        record.insert_flag("IsHTTPS", true);
        record.insert_number("URLCharProb", 0.123456789);
        record.insert_text("Title", "Sign in");

        assert_eq!(record.number("NoOfJS"), Some(3.0));
        assert_eq!(record.number("IsHTTPS"), Some(1.0));
        assert_eq!(record.number("URLCharProb"), Some(0.123457));
        assert_eq!(record.number("Title"), None);
        assert_eq!(
            record.get("Title"),
            Some(&FeatureValue::Text("Sign in".into()))
        );
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_merge_disjoint_records() {
        let mut left = FeatureRecord::new();
        left.insert_count("URLLength", 10);
        let mut right = FeatureRecord::new();
        right.insert_count("NoOfImage", 2);

        left.merge(right).expect("disjoint merge");
        assert_eq!(left.len(), 2);
        assert_eq!(left.number("NoOfImage"), Some(2.0));
    }

    #[test]
    fn test_merge_rejects_duplicate_names() {
        let mut left = FeatureRecord::new();
        left.insert_flag("Bank", false);
        left.insert_count("URLLength", 10);
        let mut right = FeatureRecord::new();
        right.insert_flag("Bank", true);

        let err = left.merge(right).expect_err("duplicate must fail");
        assert_eq!(err, PredictError::DuplicateFeature("Bank".into()));
        // unchanged on failure
        assert_eq!(left.number("Bank"), Some(0.0));
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut record = FeatureRecord::new();
        record.insert_count("b", 1);
        record.insert_count("a", 1);
        record.insert_count("c", 1);
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut record = FeatureRecord::new();
        record.insert_count("NoOfJS", 2);
        record.insert_text("Title", "Home");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"NoOfJS":2.0,"Title":"Home"}"#);
    }
}
