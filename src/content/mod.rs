//! Content features computed from the fetched target page.
//!
//! This module provides:
//! - A single bounded fetch of the target ([`fetch_page`])
//! - HTML analysis producing the content feature record ([`analyze_page`])
//! - The fetch target guard shared with the client's redirect policy
//!
//! Extraction is best effort. Any fetch failure is logged at debug level and
//! replaced by [`default_content_features`] as a whole, never a partial mix.

mod fetch;
mod html;
mod social;
mod target;

use std::time::Duration;

use crate::config::Config;
use crate::error_handling::{FetchError, InitializationError};
use crate::features::FeatureRecord;
use crate::initialization::init_client;
use crate::normalize::NormalizedUrl;

// Re-export public API
pub use fetch::{fetch_page, FetchedPage};
pub use html::{analyze_page, classify_reference, title_match_score, ReferenceClass};
pub use social::is_social_link;
pub use target::ensure_public_target;

/// Every name the content extractor emits.
pub const CONTENT_FEATURES: [&str; 29] = [
    "LineOfCode",
    "LargestLineLength",
    "HasTitle",
    "Title",
    "DomainTitleMatchScore",
    "URLTitleMatchScore",
    "HasFavicon",
    "Robots",
    "IsResponsive",
    "NoOfURLRedirect",
    "NoOfSelfRedirect",
    "HasDescription",
    "NoOfPopup",
    "NoOfiFrame",
    "HasExternalFormSubmit",
    "HasSocialNet",
    "HasSubmitButton",
    "HasHiddenFields",
    "HasPasswordField",
    "PageBank",
    "PagePay",
    "PageCrypto",
    "HasCopyrightInfo",
    "NoOfImage",
    "NoOfCSS",
    "NoOfJS",
    "NoOfSelfRef",
    "NoOfEmptyRef",
    "NoOfExternalRef",
];

/// The record used whenever the page cannot be fetched: every feature zero,
/// `Title` empty.
pub fn default_content_features() -> FeatureRecord {
    let mut record = FeatureRecord::new();
    for name in CONTENT_FEATURES {
        if name == "Title" {
            record.insert_text(name, "");
        } else {
            record.insert_number(name, 0.0);
        }
    }
    record
}

/// Fetches target pages and turns them into content feature records.
///
/// Holds one shared `reqwest::Client`; cloning is cheap and clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: reqwest::Client,
    timeout: Duration,
    allow_private_hosts: bool,
}

impl ContentExtractor {
    /// Builds an extractor with a client configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be
    /// built.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        Ok(Self::from_client(
            client,
            config.fetch_timeout(),
            config.allow_private_hosts,
        ))
    }

    /// Wraps an existing client.
    pub fn from_client(client: reqwest::Client, timeout: Duration, allow_private_hosts: bool) -> Self {
        Self {
            client,
            timeout,
            allow_private_hosts,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Content features for `url`, or the default record if the page could
    /// not be fetched.
    ///
    /// Never fails and never waits longer than the configured timeout.
    pub async fn extract(&self, url: &NormalizedUrl) -> FeatureRecord {
        match self.try_extract(url).await {
            Ok(record) => record,
            Err(e) => {
                log::debug!(
                    "Content fetch for {} failed ({}): {}; using default content features",
                    url.original,
                    e.kind(),
                    e
                );
                default_content_features()
            }
        }
    }

    /// Content features for `url`, surfacing the fetch failure.
    pub async fn try_extract(&self, url: &NormalizedUrl) -> Result<FeatureRecord, FetchError> {
        if url.host.is_empty() {
            return Err(FetchError::InvalidUrl(format!(
                "no host in '{}'",
                url.original
            )));
        }
        let page = fetch_page(
            &self.client,
            &url.to_url_string(),
            self.timeout,
            self.allow_private_hosts,
        )
        .await?;
        Ok(analyze_page(&page.body, &page.final_url, url))
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;
    use crate::error_handling::FetchFailureKind;
    use crate::features::FeatureValue;
    use crate::normalize::{normalize_url, HostPolicy};

    #[test]
    fn test_default_content_features() {
        let record = default_content_features();
        assert_eq!(record.len(), CONTENT_FEATURES.len());
        for name in CONTENT_FEATURES {
            if name == "Title" {
                assert_eq!(record.get(name), Some(&FeatureValue::Text(String::new())));
            } else {
                assert_eq!(record.number(name), Some(0.0), "{name} should default to 0");
            }
        }
    }

    #[test]
    fn test_content_names_do_not_collide_with_lexical_names() {
        for name in CONTENT_FEATURES {
            assert!(
                !crate::features::LEXICAL_FEATURES.contains(&name),
                "{name} is emitted by both extractors"
            );
        }
    }

    #[tokio::test]
    async fn test_extract_falls_back_for_private_target() {
        let extractor = ContentExtractor::new(&Config::default()).expect("client builds");
        let url = normalize_url("http://127.0.0.1:9/login", HostPolicy::Preserve);

        let err = extractor
            .try_extract(&url)
            .await
            .expect_err("loopback must be refused");
        assert_eq!(err.kind(), FetchFailureKind::UnsafeTarget);
        assert_eq!(extractor.extract(&url).await, default_content_features());
    }

    #[tokio::test]
    async fn test_extract_falls_back_for_empty_host() {
        let extractor = ContentExtractor::new(&Config::default()).expect("client builds");
        let url = normalize_url("", HostPolicy::Preserve);

        let err = extractor.try_extract(&url).await.expect_err("no host");
        assert_eq!(err.kind(), FetchFailureKind::InvalidUrl);
        assert_eq!(extractor.extract(&url).await, default_content_features());
    }
}
