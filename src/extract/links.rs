//! Link discovery: contact page, about page and outbound links
//!
//! # Candidate Rules
//!
//! **Contact:** anchor text containing contact, support, get in touch,
//! reach out or email us, or an href containing contact or support.
//!
//! **About:** anchor text or href containing about, team or company.
//!
//! Candidates resolve against the page URL and must be http(s). Links into
//! bypass domains (a LinkedIn `/company/` page, say) are skipped since they
//! are never crawled. The first remaining candidate in document order wins.

use super::{parse_selector, push_unique, ExtractError};
use crate::url::UrlPolicy;
use scraper::Html;
use url::Url;

const CONTACT_TEXT_KEYWORDS: &[&str] = &[
    "contact",
    "support",
    "get in touch",
    "reach out",
    "email us",
];
const CONTACT_HREF_KEYWORDS: &[&str] = &["contact", "support"];
const ABOUT_KEYWORDS: &[&str] = &["about", "team", "company"];

/// First contact-page candidate on the page
pub fn find_contact_link(
    document: &Html,
    base_url: &Url,
    policy: &UrlPolicy,
) -> Result<Option<String>, ExtractError> {
    first_candidate(
        document,
        base_url,
        policy,
        CONTACT_TEXT_KEYWORDS,
        CONTACT_HREF_KEYWORDS,
    )
}

/// First about-page candidate on the page
pub fn find_about_link(
    document: &Html,
    base_url: &Url,
    policy: &UrlPolicy,
) -> Result<Option<String>, ExtractError> {
    first_candidate(document, base_url, policy, ABOUT_KEYWORDS, ABOUT_KEYWORDS)
}

fn first_candidate(
    document: &Html,
    base_url: &Url,
    policy: &UrlPolicy,
    text_keywords: &[&str],
    href_keywords: &[&str],
) -> Result<Option<String>, ExtractError> {
    let selector = parse_selector("a[href]")?;

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let text = anchor.text().collect::<String>().to_lowercase();
        let href_lower = href.to_lowercase();
        let matched = text_keywords.iter().any(|k| text.contains(k))
            || href_keywords.iter().any(|k| href_lower.contains(k));
        if !matched {
            continue;
        }

        let Some(resolved) = resolve_link(href, base_url) else {
            continue;
        };

        if policy.is_bypass_domain(resolved.as_str()) {
            continue;
        }

        return Ok(Some(resolved.to_string()));
    }

    Ok(None)
}

/// Absolute links to other hosts, deduplicated and capped
///
/// `www.` is ignored when comparing hosts, so `acme.io` and `www.acme.io`
/// count as the same site.
pub fn external_links(
    document: &Html,
    base_url: &Url,
    cap: usize,
) -> Result<Vec<String>, ExtractError> {
    let selector = parse_selector("a[href]")?;
    let page_host = base_url.host_str().map(site_host).unwrap_or_default();
    let mut links = Vec::new();

    for anchor in document.select(&selector) {
        if links.len() >= cap {
            break;
        }

        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if !href.starts_with("http://") && !href.starts_with("https://") {
            continue;
        }

        let Ok(url) = Url::parse(href) else {
            continue;
        };
        let Some(host) = url.host_str().map(site_host) else {
            continue;
        };

        if host != page_host {
            push_unique(&mut links, [href.to_string()]);
        }
    }

    Ok(links)
}

fn site_host(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}
