//! Error categorization.
//!
//! Maps transport-level `reqwest` failures onto [`FetchError`] so the content
//! extractor can log one enumerated cause per failed fetch.

use super::types::FetchError;

/// Categorizes a `reqwest::Error` into a [`FetchError`].
///
/// Status codes are checked first, then the reqwest error class.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::Status(status.as_u16());
    }

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_builder() {
        FetchError::InvalidUrl(error.to_string())
    } else if error.is_redirect() {
        FetchError::Redirect(error.to_string())
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_decode() {
        FetchError::Decode
    } else {
        FetchError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FetchFailureKind;

    #[tokio::test]
    async fn test_categorize_builder_error() {
        // A relative URL cannot be turned into a request.
        let client = reqwest::Client::new();
        let error = client
            .get("not a url")
            .send()
            .await
            .expect_err("relative URL must fail");
        assert_eq!(
            categorize_reqwest_error(&error).kind(),
            FetchFailureKind::InvalidUrl
        );
    }

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Port 9 on localhost is the discard port and is closed on test machines.
        let client = reqwest::Client::new();
        let error = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("closed port must fail");
        let kind = categorize_reqwest_error(&error).kind();
        assert!(
            matches!(kind, FetchFailureKind::Connect | FetchFailureKind::Request),
            "unexpected kind {:?}",
            kind
        );
    }
}
