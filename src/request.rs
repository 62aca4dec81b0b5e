//! Prediction request and response payloads.

use serde::{Deserialize, Serialize};

use crate::error_handling::PredictError;
use crate::predict::PredictionResult;

/// Message for a body that is not a non-empty JSON object.
pub const NO_JSON_MESSAGE: &str = "No JSON received";
/// Message for an object without a `url` key.
pub const MISSING_URL_MESSAGE: &str = "Missing \"url\" key in request";

/// `{ "url": "..." }`
///
/// `url` is kept as a raw JSON value so a wrong type can be reported as an
/// input error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<serde_json::Value>,
}

impl PredictRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(serde_json::Value::String(url.into())),
        }
    }

    /// Parses and checks a request body.
    ///
    /// # Errors
    ///
    /// `PredictError::Input` if the body is not a non-empty JSON object or its
    /// `url` is unusable (see [`PredictRequest::url`]).
    pub fn from_json(body: &str) -> Result<Self, PredictError> {
        let request = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) if !map.is_empty() => Self {
                url: map.get("url").cloned(),
            },
            _ => return Err(PredictError::Input(NO_JSON_MESSAGE.to_string())),
        };
        request.url()?;
        Ok(request)
    }

    /// The URL to classify.
    ///
    /// # Errors
    ///
    /// `PredictError::Input` if `url` is missing, not a string or blank.
    pub fn url(&self) -> Result<&str, PredictError> {
        match &self.url {
            None => Err(PredictError::Input(MISSING_URL_MESSAGE.to_string())),
            Some(serde_json::Value::String(url)) if url.trim().is_empty() => Err(
                PredictError::Input("\"url\" must not be empty".to_string()),
            ),
            Some(serde_json::Value::String(url)) => Ok(url),
            Some(_) => Err(PredictError::Input("\"url\" must be a string".to_string())),
        }
    }
}

/// Either `{ "prediction": 0|1, "score": .. }` or `{ "error": ".." }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Success {
        prediction: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
    Failure {
        error: String,
    },
}

impl PredictResponse {
    /// A failure payload carrying only the caller-safe message of `err`.
    pub fn failure(err: &PredictError) -> Self {
        PredictResponse::Failure {
            error: err.public_message(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictResponse::Success { .. })
    }
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        PredictResponse::Success {
            prediction: result.label,
            score: result.score,
        }
    }
}
