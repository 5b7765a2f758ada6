//! Redirect-wrapper resolution and canonical URL discovery
//!
//! A listing platform often hides a product's website behind its own
//! redirect link. [`resolve_redirect`] tries three tiers, cheapest first:
//!
//! 1. an embedded `url` query parameter
//! 2. a manual GET that reads the `Location` header of a 3xx response
//! 3. the wrapper page itself, searched for an off-platform target
//!
//! Nothing here returns an error. A failed tier falls through to the next,
//! and `None` tells the caller to keep the URL it already has.

use super::fetcher::{FetchResult, Fetcher};
use crate::extract::{isolate, parse_selector, ExtractError};
use crate::url::{is_valid_url, normalize_url, UrlPolicy};
use reqwest::header::LOCATION;
use scraper::Html;
use url::Url;

/// Words in an anchor's text that mark it as the product's own link
const VISIT_KEYWORDS: &[&str] = &["visit", "website", "home"];

/// Resolves a redirect-wrapper URL to the product's website
pub async fn resolve_redirect(fetcher: &Fetcher, policy: &UrlPolicy, url: &str) -> Option<String> {
    if let Some(target) = embedded_target(url) {
        tracing::debug!("Wrapper {} resolved from query parameter", url);
        return Some(target);
    }

    if let Some(target) = location_target(fetcher, url).await {
        tracing::debug!("Wrapper {} resolved from Location header", url);
        return Some(target);
    }

    let page = fetcher
        .fetch_page(url, fetcher.timeouts().wrapper_page())
        .await;
    let body = page.body?;

    let target = isolate("wrapper-page", || wrapper_page_target(&body, url, policy)).into_value();
    match &target {
        Some(found) => tracing::debug!("Wrapper {} resolved from page to {}", url, found),
        None => tracing::debug!("Wrapper {} could not be resolved", url),
    }
    target
}

/// Tier 1: a `url` query parameter holding a valid http(s) URL
fn embedded_target(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| is_valid_url(value))
        .map(|value| normalize_url(&value))
}

/// Tier 2: the `Location` header of a non-followed 3xx response
async fn location_target(fetcher: &Fetcher, url: &str) -> Option<String> {
    let response = match fetcher
        .fetch_manual(url, fetcher.timeouts().redirect_probe())
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Redirect probe failed for {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_redirection() {
        return None;
    }

    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    let target = response.url().join(location).ok()?;
    is_valid_url(target.as_str()).then(|| normalize_url(target.as_str()))
}

/// Tier 3: an off-platform link on the wrapper page
///
/// Candidates are tried in this order: canonical link, `og:url` or
/// `twitter:url` meta, the first `rel=nofollow` anchor, then the first
/// anchor whose text mentions visit, website or home.
fn wrapper_page_target(
    html: &str,
    page_url: &str,
    policy: &UrlPolicy,
) -> Result<Option<String>, ExtractError> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();
    let absolute = |href: &str| -> Option<String> {
        let href = href.trim();
        match &base {
            Some(base) => base.join(href).ok().map(|u| u.to_string()),
            None => Url::parse(href).ok().map(|u| u.to_string()),
        }
    };
    let accept = |candidate: Option<String>| -> Option<String> {
        candidate
            .filter(|c| policy.is_off_platform(c))
            .map(|c| normalize_url(&c))
    };

    let canonical = parse_selector(r#"link[rel="canonical"]"#)?;
    for link in document.select(&canonical) {
        if let Some(found) = accept(link.value().attr("href").and_then(absolute)) {
            return Ok(Some(found));
        }
    }

    let social_meta = parse_selector(r#"meta[property="og:url"], meta[name="twitter:url"]"#)?;
    for meta in document.select(&social_meta) {
        if let Some(found) = accept(meta.value().attr("content").and_then(absolute)) {
            return Ok(Some(found));
        }
    }

    let nofollow = parse_selector(r#"a[rel~="nofollow"][href]"#)?;
    for anchor in document.select(&nofollow) {
        if let Some(found) = accept(anchor.value().attr("href").and_then(absolute)) {
            return Ok(Some(found));
        }
    }

    let anchors = parse_selector("a[href]")?;
    for anchor in document.select(&anchors) {
        let text = anchor.text().collect::<String>().to_lowercase();
        if !VISIT_KEYWORDS.iter().any(|k| text.contains(k)) {
            continue;
        }
        if let Some(found) = accept(anchor.value().attr("href").and_then(absolute)) {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// Finds the canonical, exact URL of a site
///
/// Follows redirects, then prefers an absolute `link[rel=canonical]` over
/// the post-redirect URL. A failed request returns the input unchanged.
pub async fn find_canonical_url(fetcher: &Fetcher, url: &str) -> String {
    let page = fetcher.fetch_page(url, fetcher.timeouts().canonical()).await;
    canonical_from_page(url, &page)
}

/// Picks the canonical URL from a fetched page
///
/// A 2xx response with an empty or unreadable body still yields its
/// post-redirect URL.
fn canonical_from_page(url: &str, page: &FetchResult) -> String {
    let success = page.status.is_some_and(|status| (200..300).contains(&status));
    if !success {
        return url.to_string();
    }

    let body = page.body.as_deref().unwrap_or_default();
    if body.trim().is_empty() {
        return normalize_url(&page.final_url);
    }

    let declared = isolate("canonical", || canonical_link(body)).into_value();
    match declared {
        Some(canonical) => normalize_url(&canonical),
        None => normalize_url(&page.final_url),
    }
}

/// An absolute, valid `link[rel=canonical]` href
fn canonical_link(html: &str) -> Result<Option<String>, ExtractError> {
    let document = Html::parse_document(html);
    let selector = parse_selector(r#"link[rel="canonical"]"#)?;

    Ok(document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .find(|href| is_valid_url(href))
        .map(str::to_string))
}
