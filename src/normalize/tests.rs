// Normalizer tests.

use super::*;

fn normalize(raw: &str) -> NormalizedUrl {
    normalize_url(raw, HostPolicy::Preserve)
}

#[test]
fn test_adds_http_scheme_when_missing() {
    let url = normalize("example.com/login");
    assert_eq!(url.scheme, "http");
    assert_eq!(url.host, "example.com");
    assert_eq!(url.path, "/login");
}

#[test]
fn test_scheme_prefix_is_case_insensitive() {
    let url = normalize("HTTPS://Example.COM/Path");
    assert_eq!(url.scheme, "https");
    assert_eq!(url.host, "example.com");
    // path case is preserved
    assert_eq!(url.path, "/Path");
    assert!(url.is_https());
}

#[test]
fn test_scheme_less_inputs_keep_logical_host() {
    for (raw, host) in [
        ("example.com", "example.com"),
        ("Example.com/foo", "example.com"),
        ("sub.domain.example.org?x=1", "sub.domain.example.org"),
        ("192.168.1.5", "192.168.1.5"),
        ("example.com:8080/a", "example.com"),
        ("paypal.com.evil.xyz#frag", "paypal.com.evil.xyz"),
    ] {
        let url = normalize(raw);
        assert!(url.scheme == "http" || url.scheme == "https");
        assert_eq!(url.host, host, "input {raw}");
    }
}

#[test]
fn test_splits_query_and_fragment() {
    let url = normalize("http://example.com/login?user=1&pass=2#top");
    assert_eq!(url.path, "/login");
    assert_eq!(url.query.as_deref(), Some("user=1&pass=2"));
    assert_eq!(url.fragment.as_deref(), Some("top"));
}

#[test]
fn test_question_mark_inside_fragment_stays_in_fragment() {
    let url = normalize("http://example.com/a#b?c");
    assert_eq!(url.query, None);
    assert_eq!(url.fragment.as_deref(), Some("b?c"));
}

#[test]
fn test_userinfo_uses_last_at_sign() {
    let url = normalize("http://www.paypal.com@evil.example/x");
    assert_eq!(url.userinfo.as_deref(), Some("www.paypal.com"));
    assert_eq!(url.host, "evil.example");
}

#[test]
fn test_port_is_split_from_host() {
    let url = normalize("https://example.com:8443/");
    assert_eq!(url.host, "example.com");
    assert_eq!(url.port.as_deref(), Some("8443"));
}

#[test]
fn test_ipv6_host_with_port() {
    let url = normalize("http://[2001:db8::1]:8080/path");
    assert_eq!(url.host, "[2001:db8::1]");
    assert_eq!(url.port.as_deref(), Some("8080"));
    assert!(is_ip_literal(&url.host));
}

#[test]
fn test_backslash_ends_authority_and_is_kept_in_path() {
    let url = normalize("http://example.com\\evil.com");
    assert_eq!(url.host, "example.com");
    assert_eq!(url.path, "\\evil.com");
}

#[test]
fn test_empty_host_is_derived_from_path() {
    let url = normalize("http:///example.com/foo");
    assert_eq!(url.host, "example.com");
    assert_eq!(url.path, "/foo");
}

#[test]
fn test_degenerate_input_has_empty_host() {
    for raw in ["", "   ", "http://", "///"] {
        let url = normalize(raw);
        assert_eq!(url.scheme, "http");
        assert!(url.host.is_empty(), "input {raw:?}");
    }
}

#[test]
fn test_input_is_trimmed() {
    let url = normalize("  example.com/a \n");
    assert_eq!(url.original, "example.com/a");
    assert_eq!(url.path, "/a");
}

#[test]
fn test_add_www_policy() {
    let url = normalize_url("example.com", HostPolicy::AddWww);
    assert_eq!(url.host, "www.example.com");

    let url = normalize_url("https://www.example.com", HostPolicy::AddWww);
    assert_eq!(url.host, "www.example.com");

    // IP literals are never prefixed
    let url = normalize_url("10.0.0.1", HostPolicy::AddWww);
    assert_eq!(url.host, "10.0.0.1");

    let url = normalize_url("", HostPolicy::AddWww);
    assert_eq!(url.host, "");
}

#[test]
fn test_add_www_keeps_submitted_host_for_fetching() {
    let url = normalize_url("shop.example.com/login", HostPolicy::AddWww);
    assert_eq!(url.host, "www.shop.example.com");
    assert_eq!(url.fetch_host, "shop.example.com");
    assert_eq!(url.to_url_string(), "http://shop.example.com/login");
    assert_eq!(
        url.stats_string(Granularity::FullUrl),
        "www.shop.example.com/login"
    );

    let url = normalize("shop.example.com/login");
    assert_eq!(url.fetch_host, url.host);
}

#[test]
fn test_stats_string_excludes_scheme() {
    let url = normalize("https://user@example.com:8080/a/b?q=1#f");
    assert_eq!(
        url.stats_string(Granularity::FullUrl),
        "user@example.com:8080/a/b?q=1#f"
    );
    assert_eq!(url.stats_string(Granularity::HostOnly), "example.com");
}

#[test]
fn test_stats_string_keeps_empty_path_segments() {
    let url = normalize("https://secure-paypal-login.com//update");
    assert_eq!(
        url.stats_string(Granularity::FullUrl),
        "secure-paypal-login.com//update"
    );
}

#[test]
fn test_to_url_string_roundtrips_parts() {
    let url = normalize("Example.com/login?next=/home");
    assert_eq!(url.to_url_string(), "http://example.com/login?next=/home");
}

#[test]
fn test_numeric_ip_hosts() {
    assert!(is_numeric_ip_host("192.168.1.5"));
    assert!(is_numeric_ip_host("3232235777"));
    assert!(is_numeric_ip_host("0300.0250.01.05"));
    assert!(is_numeric_ip_host("0xc0.0xa8.0x1.0x5"));
    assert!(!is_numeric_ip_host("example.com"));
    assert!(!is_numeric_ip_host("1.2.3.4.example.com"));
    assert!(!is_numeric_ip_host(""));
}

#[test]
fn test_normalization_is_deterministic() {
    let a = normalize("HTTP://Example.com/%41?x=1");
    let b = normalize("HTTP://Example.com/%41?x=1");
    assert_eq!(a, b);
}
