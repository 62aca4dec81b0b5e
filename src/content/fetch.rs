//! Single bounded page fetch.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::target::ensure_public_target;
use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{categorize_reqwest_error, FetchError};

/// A successfully fetched HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub final_url: Url,
    pub body: String,
}

fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Fetches `target` once, bounded by `timeout` end to end.
///
/// A missing `Content-Type` header is accepted as HTML; any other non-HTML
/// type, a non-success status, a body over `MAX_RESPONSE_BODY_SIZE` or a body
/// that is not UTF-8 is an error.
pub async fn fetch_page(
    client: &reqwest::Client,
    target: &str,
    timeout: Duration,
    allow_private_hosts: bool,
) -> Result<FetchedPage, FetchError> {
    let url = Url::parse(target).map_err(|e| FetchError::InvalidUrl(format!("{target}: {e}")))?;
    if !allow_private_hosts {
        ensure_public_target(&url)?;
    }

    // The client timeout covers the request; this bound also covers body reads
    match tokio::time::timeout(timeout, fetch_body(client, url, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    }
}

async fn fetch_body(
    client: &reqwest::Client,
    url: Url,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    let mut response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        if !is_html_content_type(content_type) {
            return Err(FetchError::NotHtml(content_type.to_string()));
        }
    }

    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BODY_SIZE as u64)
    {
        return Err(FetchError::TooLarge(MAX_RESPONSE_BODY_SIZE));
    }

    let final_url = response.url().clone();
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?
    {
        if bytes.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
            return Err(FetchError::TooLarge(MAX_RESPONSE_BODY_SIZE));
        }
        bytes.extend_from_slice(&chunk);
    }

    let body = String::from_utf8(bytes).map_err(|_| FetchError::Decode)?;
    Ok(FetchedPage { final_url, body })
}
