//! URL obfuscation signals.
//!
//! Each pattern is a spelling historically used to hide where a URL really
//! points. Matches are counted across all patterns over the statistics
//! string; a numeric IP literal host counts as one more match.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::is_numeric_ip_host;

const OBFUSCATION_PATTERNS: &[(&str, &str)] = &[
    ("backslash", r"\\"),
    ("double_slash", r"//"),
    ("percent_encoding", r"%[0-9A-Fa-f]{2}"),
    ("html_decimal_reference", r"&#[0-9]+;?"),
    ("html_hex_reference", r"&#[xX][0-9A-Fa-f]+;?"),
    ("hex_literal", r"0[xX][0-9A-Fa-f]+"),
    ("punycode_label", r"(?i)xn--"),
    ("login_trick", r"@"),
];

static OBFUSCATION_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    OBFUSCATION_PATTERNS
        .iter()
        .map(|(name, pattern)| {
            let re = Regex::new(pattern).unwrap_or_else(|e| {
                panic!(
                    "Failed to compile obfuscation pattern '{}': {}. This is a programming error.",
                    name, e
                )
            });
            (*name, re)
        })
        .collect()
});

/// Counts obfuscation matches in `stats` plus one for a numeric IP `host`.
pub fn count_obfuscation(stats: &str, host: &str) -> usize {
    let mut total = 0;
    for (name, re) in OBFUSCATION_RES.iter() {
        let matches = re.find_iter(stats).count();
        if matches > 0 {
            log::trace!("Obfuscation pattern {name} matched {matches} time(s)");
            total += matches;
        }
    }
    if is_numeric_ip_host(host) {
        log::trace!("Obfuscation: numeric IP literal host {host}");
        total += 1;
    }
    total
}
