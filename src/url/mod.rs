//! URL handling module for Contact-Scout
//!
//! This module provides URL validation and normalization, host extraction,
//! domain matching, and the bypass/redirect-wrapper classification used
//! before a site is crawled.

mod domain;
mod matcher;
mod normalize;

use crate::config::Config;
use once_cell::sync::Lazy;

// Re-export main functions
pub use domain::{extract_domain, host_of};
pub use matcher::matches_domain;
pub use normalize::{ensure_scheme, is_valid_url, normalize_url};

/// Major platforms whose pages are never crawled for contacts
pub const DEFAULT_BYPASS_DOMAINS: &[&str] = &[
    "facebook.com",
    "fb.com",
    "apple.com",
    "google.com",
    "microsoft.com",
    "amazon.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "github.com",
    "netflix.com",
    "spotify.com",
    "adobe.com",
    "salesforce.com",
    "oracle.com",
    "ibm.com",
    "intel.com",
    "cisco.com",
    "samsung.com",
    "meta.com",
    "alphabet.com",
    "openai.com",
    "anthropic.com",
    "gemini.com",
    "bard.google.com",
];

static DEFAULT_POLICY: Lazy<UrlPolicy> = Lazy::new(UrlPolicy::default);

/// Host classification rules applied before and during a crawl
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    bypass_domains: Vec<String>,
    wrapper_patterns: Vec<String>,
    /// The listing platform plus the hosts named by wrapper patterns
    platform_hosts: Vec<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl UrlPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bypass_domains: config
                .filters
                .bypass_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            wrapper_patterns: config.resolver.wrapper_patterns.clone(),
            platform_hosts: platform_hosts(config),
        }
    }

    /// True when the URL's host is a bypass domain or a subdomain of one
    ///
    /// Unparseable input is never bypassed.
    pub fn is_bypass_domain(&self, url: &str) -> bool {
        match host_of(url) {
            Some(host) => self
                .bypass_domains
                .iter()
                .any(|entry| matches_domain(entry, &host)),
            None => false,
        }
    }

    /// True when the URL contains a listing-platform redirect pattern
    pub fn is_redirect_wrapper_url(&self, url: &str) -> bool {
        self.wrapper_patterns
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
    }

    /// True for an http(s) URL whose host is neither the listing platform
    /// nor one of its short-link hosts
    pub fn is_off_platform(&self, url: &str) -> bool {
        if !is_valid_url(url) {
            return false;
        }

        match host_of(url) {
            Some(host) => !self
                .platform_hosts
                .iter()
                .any(|platform| matches_domain(platform, &host)),
            None => false,
        }
    }
}

/// `platform-host` plus the host part of each wrapper pattern
///
/// `producthunt.com/r/` contributes `producthunt.com` and `ph.co/` contributes
/// `ph.co`. Path-only patterns such as `/r/` name no host.
fn platform_hosts(config: &Config) -> Vec<String> {
    let mut hosts = vec![config.resolver.platform_host.to_lowercase()];
    for pattern in &config.resolver.wrapper_patterns {
        let host = pattern
            .split('/')
            .next()
            .unwrap_or_default()
            .trim_start_matches("www.")
            .to_lowercase();
        if host.contains('.') && !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

/// Checks a URL against the default bypass list
///
/// # Examples
///
/// ```
/// use contact_scout::url::is_bypass_domain;
///
/// assert!(is_bypass_domain("https://www.facebook.com/acme"));
/// assert!(!is_bypass_domain("https://acme-widgets.io"));
/// ```
pub fn is_bypass_domain(url: &str) -> bool {
    DEFAULT_POLICY.is_bypass_domain(url)
}

/// Checks a URL against the default redirect-wrapper patterns
pub fn is_redirect_wrapper_url(url: &str) -> bool {
    DEFAULT_POLICY.is_redirect_wrapper_url(url)
}
