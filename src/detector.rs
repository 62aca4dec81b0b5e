//! Per-request detection pipeline.
//!
//! raw URL → normalize → lexical (+ content) features → assemble → score.
//! The normalization policy, statistics granularity and whether content
//! features are used all come from the bundle, so a detector always feeds its
//! model the features it was trained on.

use std::sync::Arc;

use crate::config::Config;
use crate::content::{default_content_features, ContentExtractor};
use crate::error_handling::{InitializationError, PredictError};
use crate::features::{extract_lexical_features, FeatureRecord};
use crate::model::ModelBundle;
use crate::normalize::normalize_url;
use crate::predict::{PredictionResult, PredictionService};
use crate::request::{PredictRequest, PredictResponse};

#[derive(Debug, Clone)]
pub struct Detector {
    service: PredictionService,
    content: Option<ContentExtractor>,
}

impl Detector {
    /// Builds a detector for `bundle`.
    ///
    /// The HTTP client is only built when the bundle uses content features
    /// and `config.offline` is not set. Offline, content features take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the HTTP client cannot be built.
    pub fn new(bundle: Arc<ModelBundle>, config: &Config) -> Result<Self, InitializationError> {
        let uses_content = bundle.preprocessing().content_features;
        let content = if uses_content && !config.offline {
            Some(ContentExtractor::new(config)?)
        } else {
            if uses_content {
                log::warn!("Offline mode: content features will use their default values");
            }
            None
        };
        Ok(Self {
            service: PredictionService::new(bundle),
            content,
        })
    }

    /// Replaces the content extractor, e.g. with one built around a custom
    /// client.
    pub fn with_content_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.content = Some(extractor);
        self
    }

    pub fn bundle(&self) -> &Arc<ModelBundle> {
        self.service.bundle()
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }

    /// Extracts every feature the bundle's extractors produce for `raw`.
    ///
    /// # Errors
    ///
    /// `PredictError::DuplicateFeature` if the lexical and content records
    /// share a name.
    pub async fn extract_features(&self, raw: &str) -> Result<FeatureRecord, PredictError> {
        let preprocessing = self.bundle().preprocessing();
        let url = normalize_url(raw, preprocessing.host_policy);
        let mut record = extract_lexical_features(&url, preprocessing.granularity);

        if preprocessing.content_features {
            let content = match &self.content {
                Some(extractor) => extractor.extract(&url).await,
                None => default_content_features(),
            };
            record.merge(content)?;
        }
        Ok(record)
    }

    /// Runs the whole pipeline for one raw URL.
    pub async fn predict_url(&self, raw: &str) -> Result<PredictionResult, PredictError> {
        if raw.trim().is_empty() {
            return Err(PredictError::Input("\"url\" must not be empty".to_string()));
        }
        let record = self.extract_features(raw).await?;
        self.service.predict(&record)
    }

    /// Whether `result` means phishing for this detector's bundle.
    pub fn is_phishing(&self, result: &PredictionResult) -> bool {
        self.service.is_phishing(result)
    }

    /// Answers one request with a caller-safe payload.
    ///
    /// Error details are logged; the payload only carries
    /// [`PredictError::public_message`].
    pub async fn handle(&self, request: &PredictRequest) -> PredictResponse {
        let result = match request.url() {
            Ok(url) => self.predict_url(url).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(prediction) => prediction.into(),
            Err(e) => {
                if e.is_client_error() {
                    log::warn!("Rejected request ({}): {}", e.kind(), e);
                } else {
                    log::error!("Prediction failed ({}): {}", e.kind(), e);
                }
                PredictResponse::failure(&e)
            }
        }
    }
}
