//! Lexical features: statistics over the URL text alone, no network access.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::obfuscation::count_obfuscation;
use super::record::{ratio, FeatureRecord};
use super::tld::{tld_legitimate_prob, tld_of};
use crate::normalize::{Granularity, NormalizedUrl};

/// Every name the lexical extractor emits.
pub const LEXICAL_FEATURES: [&str; 24] = [
    "URLLength",
    "DomainLength",
    "IsDomainIP",
    "TLDLength",
    "NoOfSubDomain",
    "CharContinuationRate",
    "TLDLegitimateProb",
    "URLCharProb",
    "NoOfObfuscatedChar",
    "HasObfuscation",
    "ObfuscationRatio",
    "NoOfLettersInURL",
    "LetterRatioInURL",
    "NoOfDegitsInURL",
    "DegitRatioInURL",
    "NoOfOtherSpecialCharsInURL",
    "SpacialCharRatioInURL",
    "NoOfEqualsInURL",
    "NoOfQMarkInURL",
    "NoOfAmpersandInURL",
    "IsHTTPS",
    "Bank",
    "Pay",
    "Crypto",
];

static DOTTED_QUAD_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+\.\d+").unwrap_or_else(|e| {
        panic!("Failed to compile DOTTED_QUAD_PREFIX_RE: {e}. This is a programming error.")
    })
});

/// Number of runs of three or more identical consecutive characters.
fn count_repeated_runs(chars: &[char]) -> usize {
    let mut runs = 0;
    let mut run_len = 0;
    let mut previous = None;
    for &c in chars {
        if Some(c) == previous {
            run_len += 1;
        } else {
            if run_len >= 3 {
                runs += 1;
            }
            previous = Some(c);
            run_len = 1;
        }
    }
    if run_len >= 3 {
        runs += 1;
    }
    runs
}

/// Mean over distinct characters of occurrences / total.
fn mean_char_probability(chars: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for &c in chars {
        *counts.entry(c).or_insert(0) += 1;
    }
    let total = chars.len() as f64;
    let sum: f64 = counts.values().map(|&n| n as f64 / total).sum();
    sum / counts.len() as f64
}

fn subdomain_count(host: &str, is_ip: bool) -> usize {
    if host.is_empty() || is_ip {
        return 0;
    }
    host.split('.')
        .filter(|label| !label.is_empty())
        .count()
        .saturating_sub(2)
}

/// Computes every feature in [`LEXICAL_FEATURES`] for `url`.
///
/// Length and ratio features use the statistics string selected by
/// `granularity`; the `=`/`?`/`&` counts and keyword flags use the full
/// original input.
pub fn extract_lexical_features(url: &NormalizedUrl, granularity: Granularity) -> FeatureRecord {
    let stats = url.stats_string(granularity);
    let chars: Vec<char> = stats.chars().collect();
    let length = chars.len();
    let host = url.host.as_str();
    let tld = tld_of(host);
    let is_ip = DOTTED_QUAD_PREFIX_RE.is_match(host);

    let letters = chars.iter().filter(|c| c.is_alphabetic()).count();
    let digits = chars
        .iter()
        .filter(|c| !c.is_alphabetic() && c.is_numeric())
        .count();
    let special = length - letters - digits;

    let obfuscated = count_obfuscation(&stats, host);
    let lowercase_original = url.original.to_lowercase();

    let mut record = FeatureRecord::new();
    record.insert_count("URLLength", length);
    record.insert_count("DomainLength", host.chars().count());
    record.insert_flag("IsDomainIP", is_ip);
    record.insert_count("TLDLength", tld.chars().count());
    record.insert_count("NoOfSubDomain", subdomain_count(host, url.host_is_numeric_ip()));
    record.insert_number(
        "CharContinuationRate",
        ratio(count_repeated_runs(&chars), length),
    );
    record.insert_number("TLDLegitimateProb", tld_legitimate_prob(&tld));
    record.insert_number("URLCharProb", mean_char_probability(&chars));
    record.insert_count("NoOfObfuscatedChar", obfuscated);
    record.insert_flag("HasObfuscation", obfuscated > 0);
    record.insert_number("ObfuscationRatio", ratio(obfuscated, length));
    record.insert_count("NoOfLettersInURL", letters);
    record.insert_number("LetterRatioInURL", ratio(letters, length));
    record.insert_count("NoOfDegitsInURL", digits);
    record.insert_number("DegitRatioInURL", ratio(digits, length));
    record.insert_count("NoOfOtherSpecialCharsInURL", special);
    record.insert_number("SpacialCharRatioInURL", ratio(special, length));
    record.insert_count("NoOfEqualsInURL", url.original.matches('=').count());
    record.insert_count("NoOfQMarkInURL", url.original.matches('?').count());
    record.insert_count("NoOfAmpersandInURL", url.original.matches('&').count());
    record.insert_flag("IsHTTPS", url.is_https());
    record.insert_flag("Bank", lowercase_original.contains("bank"));
    record.insert_flag("Pay", lowercase_original.contains("pay"));
    record.insert_flag("Crypto", lowercase_original.contains("crypto"));

    log::debug!(
        "Lexical features for {}: length={}, obfuscated={}, ip={}",
        url.original,
        length,
        obfuscated,
        is_ip
    );
    record
}
