//! Social network link detection.

use std::sync::LazyLock;

use regex::RegexSet;

// Profile/page URL shapes of the common social networks
const SOCIAL_URL_PATTERNS: &[&str] = &[
    r"(?i)^https?://(?:www\.)?linkedin\.com/(?:company|in|pub)/[^/?#]+",
    r"(?i)^https?://(?:www\.)?(?:twitter\.com|x\.com)/[^/?#]+",
    r"(?i)^https?://(?:www\.|m\.)?facebook\.com/[^/?#]+",
    r"(?i)^https?://(?:www\.)?instagram\.com/[^/?#]+",
    r"(?i)^https?://(?:www\.)?youtube\.com/(?:channel|c|user|@)[^?#]*",
    r"(?i)^https?://(?:www\.)?github\.com/[^/?#]+",
    r"(?i)^https?://(?:www\.)?tiktok\.com/@[^/?#]+",
    r"(?i)^https?://(?:www\.)?pinterest\.(?:com|co\.uk)/[^/?#]+",
    r"(?i)^https?://(?:www\.)?snapchat\.com/add/[^/?#]+",
    r"(?i)^https?://(?:www\.)?reddit\.com/(?:r|u)/[^/?#]+",
];

static SOCIAL_URL_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(SOCIAL_URL_PATTERNS).unwrap_or_else(|e| {
        panic!("Failed to compile social network patterns: {e}. This is a programming error.")
    })
});

/// Whether `href` points at a social network profile or page.
pub fn is_social_link(href: &str) -> bool {
    SOCIAL_URL_SET.is_match(href.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_links() {
        assert!(is_social_link("https://www.facebook.com/examplecorp"));
        assert!(is_social_link("https://twitter.com/example"));
        assert!(is_social_link("https://x.com/example"));
        assert!(is_social_link("http://linkedin.com/company/example"));
        assert!(is_social_link("https://www.youtube.com/@example"));
        assert!(is_social_link(" https://www.instagram.com/example "));
    }

    #[test]
    fn test_non_social_links() {
        assert!(!is_social_link("https://example.com/facebook.com/x"));
        assert!(!is_social_link("/about"));
        assert!(!is_social_link("https://www.facebook.com/"));
        assert!(!is_social_link(""));
    }
}
