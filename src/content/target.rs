//! Fetch target checks.
//!
//! The content extractor fetches whatever URL a caller submits, so targets on
//! loopback, private, link-local, multicast or reserved addresses are refused
//! before any connection is made. Redirect hops are checked with the same
//! function by the client's redirect policy.
//!
//! Only literal addresses and localhost names are checked; a public name that
//! resolves to a private address is not caught here.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::error_handling::FetchError;

/// Returns `Ok(())` when `url` is an http(s) URL with a public host.
pub fn ensure_public_target(url: &Url) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(FetchError::UnsafeTarget(format!(
                "scheme '{scheme}' is not fetchable"
            )))
        }
    }

    match url.host() {
        Some(Host::Domain(domain)) if is_localhost_domain(domain) => Err(
            FetchError::UnsafeTarget(format!("localhost name '{domain}'")),
        ),
        Some(Host::Ipv4(ip)) if is_non_public_ipv4(ip) => {
            Err(FetchError::UnsafeTarget(format!("non-public address {ip}")))
        }
        Some(Host::Ipv6(ip)) if is_non_public_ipv6(ip) => {
            Err(FetchError::UnsafeTarget(format!("non-public address {ip}")))
        }
        Some(_) => Ok(()),
        None => Err(FetchError::InvalidUrl(format!("no host in {url}"))),
    }
}

fn is_non_public_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_multicast()
        || ip.is_broadcast()
        // 0.0.0.0/8 and 240.0.0.0/4
        || ip.octets()[0] == 0
        || ip.octets()[0] >= 240
        // 100.64.0.0/10 carrier-grade NAT
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64)
}

fn is_non_public_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_non_public_ipv4(mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local
        || (first & 0xffc0) == 0xfe80
}

fn is_localhost_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    domain == "localhost" || domain == "localhost.localdomain" || domain.ends_with(".localhost")
}
