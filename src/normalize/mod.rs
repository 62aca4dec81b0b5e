//! URL normalization.
//!
//! Turns arbitrary user input into a [`NormalizedUrl`]. Normalization never
//! fails: input that cannot be split into URL parts yields a URL with an
//! empty host, and every feature computed from it degrades to zero.
//!
//! The parts are split by hand rather than with `url::Url` so that the
//! statistics string keeps the text the user supplied: backslashes,
//! percent-escapes and empty path segments are obfuscation signals and a
//! WHATWG parser would rewrite them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How the host is canonicalized.
///
/// Part of the model bundle metadata: switching it changes every length and
/// ratio feature, so a bundle is only valid for the policy it was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostPolicy {
    /// Leave the host as given (lowercased).
    #[default]
    Preserve,
    /// Prefix `www.` when absent. IP literal hosts are left untouched.
    AddWww,
}

/// Which part of the URL the lexical statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// `[userinfo@]host[:port]path[?query][#fragment]`
    #[default]
    FullUrl,
    /// Host only; path, query and fragment are blanked.
    HostOnly,
}

/// A URL split into its parts.
///
/// `scheme` is always `http` or `https`. `host` is lowercased and empty only
/// when no host could be derived from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// The input with surrounding whitespace removed.
    pub original: String,
    pub scheme: String,
    pub userinfo: Option<String>,
    pub host: String,
    /// The host as the user gave it, before [`HostPolicy`] was applied. Pages
    /// are fetched from this host.
    pub fetch_host: String,
    pub port: Option<String>,
    /// Path as written, starting with `/` or `\` when non-empty.
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

// Dotted, dword, octal and hex spellings of an IPv4 address.
static NUMERIC_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0x[0-9a-f]+|[0-9]+)(?:\.(?:0x[0-9a-f]+|[0-9]+)){0,3}$")
        .unwrap_or_else(|e| panic!("Failed to compile NUMERIC_HOST_RE: {e}. This is a programming error."))
});

impl NormalizedUrl {
    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    /// Whether the host is a numeric IPv4 literal in any spelling.
    pub fn host_is_numeric_ip(&self) -> bool {
        is_numeric_ip_host(&self.host)
    }

    /// The string lexical statistics are computed over.
    ///
    /// The scheme is never included.
    pub fn stats_string(&self, granularity: Granularity) -> String {
        match granularity {
            Granularity::HostOnly => self.host.clone(),
            Granularity::FullUrl => self.render_without_scheme(&self.host),
        }
    }

    /// Full URL suitable for fetching, built on [`NormalizedUrl::fetch_host`].
    pub fn to_url_string(&self) -> String {
        format!(
            "{}://{}",
            self.scheme,
            self.render_without_scheme(&self.fetch_host)
        )
    }

    fn render_without_scheme(&self, host: &str) -> String {
        let mut out = String::with_capacity(self.original.len() + 8);
        if let Some(userinfo) = &self.userinfo {
            out.push_str(userinfo);
            out.push('@');
        }
        out.push_str(host);
        if let Some(port) = &self.port {
            out.push(':');
            out.push_str(port);
        }
        out.push_str(&self.path);
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Whether `host` spells an IPv4 address numerically (`192.168.1.5`,
/// `3232235777`, `0300.0250.01.05`, `0xc0.0xa8.0x1.0x5`).
pub fn is_numeric_ip_host(host: &str) -> bool {
    !host.is_empty() && NUMERIC_HOST_RE.is_match(host)
}

/// Whether `host` is an IP literal, numeric IPv4 or bracketed IPv6.
pub fn is_ip_literal(host: &str) -> bool {
    is_numeric_ip_host(host) || (host.starts_with('[') && host.ends_with(']'))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let n = prefix.len();
    if s.len() >= n && s.as_bytes()[..n].eq_ignore_ascii_case(prefix.as_bytes()) {
        // prefix is ASCII, so n is a char boundary
        Some(&s[n..])
    } else {
        None
    }
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits `host[:port]` into host and numeric port.
fn split_port(hostport: &str) -> (&str, Option<&str>) {
    if hostport.starts_with('[') {
        // IPv6 literal: the port follows the closing bracket
        if let Some(end) = hostport.find(']') {
            let (host, rest) = hostport.split_at(end + 1);
            return match rest.strip_prefix(':') {
                Some(port) if port.chars().all(|c| c.is_ascii_digit()) => {
                    (host, Some(port).filter(|p| !p.is_empty()))
                }
                _ => (hostport, None),
            };
        }
        return (hostport, None);
    }
    match hostport.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => {
            (host, Some(port).filter(|p| !p.is_empty()))
        }
        _ => (hostport, None),
    }
}

/// Normalizes raw user input into a [`NormalizedUrl`].
///
/// - Input without a case-insensitive `http://` / `https://` prefix gets
///   `http://` prepended.
/// - The authority ends at the first `/`, `\`, `?` or `#`; userinfo is
///   everything before the last `@` in it.
/// - An empty host is taken from the first non-empty path segment.
/// - `policy` is applied to the host last; `fetch_host` keeps the host
///   from before it.
pub fn normalize_url(raw: &str, policy: HostPolicy) -> NormalizedUrl {
    let original = raw.trim().to_string();

    let (scheme, rest) = if let Some(rest) = strip_prefix_ignore_case(&original, "https://") {
        ("https", rest)
    } else if let Some(rest) = strip_prefix_ignore_case(&original, "http://") {
        ("http", rest)
    } else {
        ("http", original.as_str())
    };

    let authority_end = rest
        .find(|c: char| is_path_separator(c) || c == '?' || c == '#')
        .unwrap_or(rest.len());
    let (authority, remainder) = rest.split_at(authority_end);

    let (before_fragment, fragment) = match remainder.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment.to_string())),
        None => (remainder, None),
    };
    let (path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (before_fragment, None),
    };

    let (userinfo, hostport) = match authority.rsplit_once('@') {
        Some((userinfo, hostport)) => (Some(userinfo.to_string()), hostport),
        None => (None, authority),
    };
    let (host, port) = split_port(hostport);
    let mut host = host.to_lowercase();
    let mut port = port.map(str::to_string);
    let mut path = path.to_string();

    if host.is_empty() {
        let trimmed = path.trim_start_matches(is_path_separator);
        let segment_end = trimmed.find(is_path_separator).unwrap_or(trimmed.len());
        let (segment, rest_of_path) = trimmed.split_at(segment_end);
        if !segment.is_empty() {
            let (derived_host, derived_port) = split_port(segment);
            host = derived_host.to_lowercase();
            if port.is_none() {
                port = derived_port.map(str::to_string);
            }
            path = rest_of_path.to_string();
            log::debug!("Derived host '{host}' from path of '{original}'");
        }
    }

    let fetch_host = host.clone();
    if policy == HostPolicy::AddWww
        && !host.is_empty()
        && !host.starts_with("www.")
        && !is_ip_literal(&host)
    {
        host = format!("www.{host}");
    }

    NormalizedUrl {
        original,
        scheme: scheme.to_string(),
        userinfo,
        host,
        fetch_host,
        port,
        path,
        query,
        fragment,
    }
}
