//! HTTP client initialization.
//!
//! Builds the one `reqwest::Client` used for content fetches.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT};
use crate::content::ensure_public_target;

/// Initializes the content fetch client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Whole-request timeout from the config, and a shorter connect timeout
/// - Redirect following up to `MAX_REDIRECT_HOPS`, refusing hops to
///   non-public targets unless `allow_private_hosts` is set
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    let timeout = config.fetch_timeout();
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(TCP_CONNECT_TIMEOUT.min(timeout))
        .user_agent(config.user_agent.clone())
        .redirect(redirect_policy(config.allow_private_hosts))
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
}

fn redirect_policy(allow_private_hosts: bool) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECT_HOPS {
            attempt.error(format!("more than {MAX_REDIRECT_HOPS} redirects"))
        } else if !allow_private_hosts && ensure_public_target(attempt.url()).is_err() {
            let target = attempt.url().to_string();
            attempt.error(format!("redirect to non-public target {target}"))
        } else {
            attempt.follow()
        }
    })
}
