//! Structural and content features of a fetched HTML page.
//!
//! All parsing is done using CSS selectors via the `scraper` crate. Malformed
//! markup never fails: html5ever recovers the same way browsers do.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::social::is_social_link;
use crate::features::FeatureRecord;
use crate::normalize::NormalizedUrl;

/// Title tokens shorter than this are ignored by the title match scores.
const MIN_TITLE_TOKEN_CHARS: usize = 3;

fn parse_selector(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("title", "TITLE_SELECTOR"));
static FAVICON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("link[rel~='icon']", "FAVICON_SELECTOR"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("meta", "META_SELECTOR"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("a[href]", "ANCHOR_SELECTOR"));
static IFRAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("iframe", "IFRAME_SELECTOR"));
static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("form", "FORM_SELECTOR"));
static INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("input", "INPUT_SELECTOR"));
static BUTTON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("button", "BUTTON_SELECTOR"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("img", "IMAGE_SELECTOR"));
static STYLESHEET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("link[rel~='stylesheet']", "STYLESHEET_SELECTOR"));
static STYLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("style", "STYLE_SELECTOR"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("script", "SCRIPT_SELECTOR"));

/// Where a resource reference points relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceClass {
    /// Blank, a fragment (`#...`), a `javascript:` pseudo-URL or an inline
    /// `data:` URI.
    Empty,
    /// Resolves to the page's own host.
    SelfDomain,
    /// Resolves to another host, or cannot be resolved.
    External,
}

fn comparable_host(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn has_scheme(reference: &str, scheme: &str) -> bool {
    reference
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// Classifies `reference` by resolving it against `page_url`.
///
/// Hosts are compared case-insensitively with a leading `www.` ignored.
pub fn classify_reference(reference: &str, page_url: &Url) -> ReferenceClass {
    let reference = reference.trim();
    if reference.is_empty()
        || reference.starts_with('#')
        || has_scheme(reference, "javascript:")
        || has_scheme(reference, "data:")
    {
        return ReferenceClass::Empty;
    }

    let page_host = page_url.host_str().unwrap_or_default().to_ascii_lowercase();
    match page_url.join(reference) {
        Ok(resolved) => match resolved.host_str() {
            Some(host)
                if comparable_host(&host.to_ascii_lowercase()) == comparable_host(&page_host) =>
            {
                ReferenceClass::SelfDomain
            }
            _ => ReferenceClass::External,
        },
        Err(_) => ReferenceClass::External,
    }
}

/// Percentage of title tokens found in `haystack`.
///
/// Tokens are lowercased alphanumeric runs of at least
/// `MIN_TITLE_TOKEN_CHARS` characters. 0 when the title has no tokens.
pub fn title_match_score(title: &str, haystack: &str) -> f64 {
    let title = title.to_lowercase();
    let tokens: Vec<&str> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TITLE_TOKEN_CHARS)
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let haystack = haystack.to_lowercase();
    let matched = tokens
        .iter()
        .filter(|token| haystack.contains(*token))
        .count();
    100.0 * matched as f64 / tokens.len() as f64
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn attr_eq(element: &ElementRef<'_>, attr: &str, expected: &str) -> bool {
    element
        .value()
        .attr(attr)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
}

#[derive(Debug, Default)]
struct ReferenceCounts {
    self_domain: usize,
    empty: usize,
    external: usize,
}

impl ReferenceCounts {
    fn add(&mut self, class: ReferenceClass) {
        match class {
            ReferenceClass::Empty => self.empty += 1,
            ReferenceClass::SelfDomain => self.self_domain += 1,
            ReferenceClass::External => self.external += 1,
        }
    }
}

/// Computes every content feature for a fetched page.
///
/// `page_url` is the URL the body was served from (after redirects) and is
/// the base for resolving references; `target` is the normalized request URL
/// whose fetch host and fetch URL the title is matched against.
pub fn analyze_page(body: &str, page_url: &Url, target: &NormalizedUrl) -> FeatureRecord {
    let document = Html::parse_document(body);
    let lowercase_body = body.to_lowercase();

    // Lines are split on '\n' only; an empty body has no lines.
    let lines: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('\n').collect()
    };
    let line_count = lines.len();
    let largest_line = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let title = extract_title(&document);
    let domain_title_score = title_match_score(&title, &target.fetch_host);
    let url_title_score = title_match_score(&title, &target.to_url_string());

    let mut has_robots = false;
    let mut is_responsive = false;
    let mut has_description = false;
    let mut meta_refreshes = 0;
    for meta in document.select(&META_SELECTOR) {
        has_robots |= attr_eq(&meta, "name", "robots");
        is_responsive |= attr_eq(&meta, "name", "viewport");
        has_description |= attr_eq(&meta, "name", "description");
        if attr_eq(&meta, "http-equiv", "refresh") {
            meta_refreshes += 1;
        }
    }

    let mut references = ReferenceCounts::default();
    let mut self_redirects = 0;
    let mut has_social = false;
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let href = anchor.value().attr("href").unwrap_or_default();
        let class = classify_reference(href, page_url);
        if class == ReferenceClass::SelfDomain {
            self_redirects += 1;
        }
        has_social |= is_social_link(href);
        references.add(class);
    }

    let scripts: Vec<ElementRef<'_>> = document.select(&SCRIPT_SELECTOR).collect();
    for script in &scripts {
        if let Some(src) = script.value().attr("src") {
            references.add(classify_reference(src, page_url));
        }
    }

    let images: Vec<ElementRef<'_>> = document.select(&IMAGE_SELECTOR).collect();
    for image in &images {
        if let Some(src) = image.value().attr("src") {
            references.add(classify_reference(src, page_url));
        }
    }

    let stylesheets: Vec<ElementRef<'_>> = document.select(&STYLESHEET_SELECTOR).collect();
    for stylesheet in &stylesheets {
        if let Some(href) = stylesheet.value().attr("href") {
            references.add(classify_reference(href, page_url));
        }
    }
    let inline_styles = document.select(&STYLE_SELECTOR).count();

    // A form without an action submits to the page itself
    let has_external_form = document.select(&FORM_SELECTOR).any(|form| {
        form.value()
            .attr("action")
            .filter(|action| !action.trim().is_empty())
            .is_some_and(|action| classify_reference(action, page_url) == ReferenceClass::External)
    });

    let mut has_submit = document.select(&BUTTON_SELECTOR).any(|button| {
        button.value().attr("type").is_none() || attr_eq(&button, "type", "submit")
    });
    let mut has_hidden = false;
    let mut has_password = false;
    for input in document.select(&INPUT_SELECTOR) {
        has_submit |= attr_eq(&input, "type", "submit") || attr_eq(&input, "type", "image");
        has_hidden |= attr_eq(&input, "type", "hidden");
        has_password |= attr_eq(&input, "type", "password");
    }

    let has_copyright = body.contains('©')
        || lowercase_body.contains("&copy;")
        || lowercase_body.contains("copyright");

    let mut record = FeatureRecord::new();
    record.insert_count("LineOfCode", line_count);
    record.insert_count("LargestLineLength", largest_line);
    record.insert_flag("HasTitle", !title.is_empty());
    record.insert_number("DomainTitleMatchScore", domain_title_score);
    record.insert_number("URLTitleMatchScore", url_title_score);
    record.insert_text("Title", title);
    record.insert_flag("HasFavicon", document.select(&FAVICON_SELECTOR).next().is_some());
    record.insert_flag("Robots", has_robots);
    record.insert_flag("IsResponsive", is_responsive);
    record.insert_count("NoOfURLRedirect", meta_refreshes);
    record.insert_count("NoOfSelfRedirect", self_redirects);
    record.insert_flag("HasDescription", has_description);
    record.insert_count("NoOfPopup", lowercase_body.matches("window.open(").count());
    record.insert_count("NoOfiFrame", document.select(&IFRAME_SELECTOR).count());
    record.insert_flag("HasExternalFormSubmit", has_external_form);
    record.insert_flag("HasSocialNet", has_social);
    record.insert_flag("HasSubmitButton", has_submit);
    record.insert_flag("HasHiddenFields", has_hidden);
    record.insert_flag("HasPasswordField", has_password);
    record.insert_flag("PageBank", lowercase_body.contains("bank"));
    record.insert_flag("PagePay", lowercase_body.contains("pay"));
    record.insert_flag("PageCrypto", lowercase_body.contains("crypto"));
    record.insert_flag("HasCopyrightInfo", has_copyright);
    record.insert_count("NoOfImage", images.len());
    record.insert_count("NoOfCSS", stylesheets.len() + inline_styles);
    record.insert_count("NoOfJS", scripts.len());
    record.insert_count("NoOfSelfRef", references.self_domain);
    record.insert_count("NoOfEmptyRef", references.empty);
    record.insert_count("NoOfExternalRef", references.external);

    log::debug!(
        "Content features for {}: {} lines, {} self / {} empty / {} external references",
        page_url,
        line_count,
        references.self_domain,
        references.empty,
        references.external
    );
    record
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
