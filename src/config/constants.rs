//! Configuration constants.
//!
//! Timeouts, size limits and other operational parameters shared by the
//! content fetcher and the feature extractors.

use std::time::Duration;

/// Default per-request content fetch timeout in seconds.
///
/// Covers the whole fetch: DNS, connect, TLS, redirects and body download.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// TCP connection timeout for the content fetch client.
pub const TCP_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default User-Agent string for content fetches.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Maximum response body size in bytes (2MB).
/// Larger pages are treated as a failed fetch and yield the default content vector.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum number of redirect hops followed inside the single content fetch.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Decimal digits every numeric feature is rounded to.
pub const FEATURE_ROUND_DIGITS: i32 = 6;

/// Default number of inputs the CLI classifies concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Environment variable holding the model bundle path.
pub const BUNDLE_PATH_ENV: &str = "PHISHGUARD_BUNDLE";
