//! Top-level domain lookup.

/// Trust score for TLDs missing from the table, and for hosts without a TLD.
pub const UNKNOWN_TLD_PROBABILITY: f64 = 0.5;

/// The suffix after the last `.` of `host`, lowercased. Empty without a dot.
pub fn tld_of(host: &str) -> String {
    host.rsplit_once('.')
        .map(|(_, tld)| tld.to_lowercase())
        .unwrap_or_default()
}

/// Empirical probability that a URL under `tld` is legitimate.
pub fn tld_legitimate_prob(tld: &str) -> f64 {
    match tld {
        "com" => 0.95,
        "org" => 0.90,
        "net" => 0.90,
        "gov" => 0.98,
        "edu" => 0.97,
        "io" => 0.85,
        "co" => 0.85,
        "us" => 0.80,
        "biz" => 0.75,
        "info" => 0.70,
        "xyz" => 0.40,
        "top" => 0.30,
        "tk" => 0.20,
        "ml" => 0.20,
        "gq" => 0.10,
        "cf" => 0.10,
        _ => UNKNOWN_TLD_PROBABILITY,
    }
}
