//! Site crawl orchestration
//!
//! This module drives one website crawl from a raw URL to a
//! [`ContactRecord`], including:
//! - Scheme repair and validation
//! - Redirect-wrapper resolution and the bypass check
//! - Canonical URL discovery
//! - The main page fetch and analysis under a parse-phase deadline
//! - Contact and about page follow-ups within the same deadline
//!
//! Every step degrades to an empty record instead of failing, so a crawl
//! always returns something usable.

use super::analysis::{PageAnalyzer, PageSignals};
use super::fetcher::Fetcher;
use super::resolver::{find_canonical_url, resolve_redirect};
use crate::config::Config;
use crate::model::ContactRecord;
use crate::url::{ensure_scheme, is_valid_url};
use crate::ScoutError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};

/// Anything that can turn a website URL into contact signals
///
/// The batch policies and the monitor depend on this trait rather than on
/// [`SiteCrawler`], so tests can plug in a scripted scraper.
#[async_trait]
pub trait ContactScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> ContactRecord;
}

#[derive(Debug, Clone, Copy)]
enum SecondaryPage {
    Contact,
    About,
}

/// The real crawler, backed by HTTP
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    fetcher: Fetcher,
    analyzer: Arc<PageAnalyzer>,
}

impl SiteCrawler {
    /// Creates a crawler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SiteCrawler)` - Ready to crawl
    /// * `Err(ScoutError)` - The HTTP clients could not be built
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            analyzer: Arc::new(PageAnalyzer::from_config(config)),
        })
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    async fn crawl(&self, input: &str) -> ContactRecord {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return ContactRecord::empty(input);
        }

        let mut url = ensure_scheme(trimmed);
        if !is_valid_url(&url) {
            tracing::warn!("Skipping invalid URL: {}", input);
            return ContactRecord::empty(input);
        }

        let policy = self.analyzer.policy();
        if policy.is_redirect_wrapper_url(&url) {
            if let Some(target) = resolve_redirect(&self.fetcher, policy, &url).await {
                tracing::info!("Resolved redirect {} -> {}", url, target);
                url = target;
            }
        }

        if policy.is_bypass_domain(&url) {
            tracing::info!("Skipping bypass domain: {}", url);
            return ContactRecord::empty(url);
        }

        let exact = find_canonical_url(&self.fetcher, &url).await;
        let timeouts = self.fetcher.timeouts();

        let response = match self.fetcher.fetch(&url, timeouts.main_page()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Main page fetch failed for {}: {}", url, e);
                return ContactRecord::empty(exact);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Main page for {} returned status {}",
                url,
                response.status().as_u16()
            );
            return ContactRecord::empty(exact);
        }

        let page_url = response.url().to_string();
        let body = match self.fetcher.read_body(response, timeouts.body_read()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Reading main page body failed for {}: {}", url, e);
                return ContactRecord::empty(exact);
            }
        };

        let deadline = Instant::now() + timeouts.parse_phase();
        let analyzer = Arc::clone(&self.analyzer);
        let task = tokio::task::spawn_blocking(move || analyzer.main_page(&body, &page_url));

        let main = match timeout_at(deadline, task).await {
            Ok(Ok(main)) => main,
            Ok(Err(e)) => {
                tracing::warn!("Main page analysis failed for {}: {}", url, e);
                return ContactRecord::empty(exact);
            }
            Err(_) => {
                tracing::warn!("Main page analysis timed out for {}", url);
                return ContactRecord::empty(exact);
            }
        };

        let (contact, about) = tokio::join!(
            self.secondary(main.contact_url.as_deref(), SecondaryPage::Contact, deadline),
            self.secondary(main.about_url.as_deref(), SecondaryPage::About, deadline),
        );

        let mut record = ContactRecord::empty(exact);
        record.add_emails(&main.emails);
        record.add_emails(&main.footer.emails);
        record.add_emails(&contact.emails);
        record.add_emails(&about.emails);
        record.social.merge(main.social);
        record.social.merge(main.footer.social);
        record.social.merge(contact.social);
        record.social.merge(about.social);
        record.contact_page_url = main.contact_url;
        record.about_page_url = main.about_url;
        record.external_links = main.external_links;

        tracing::info!(
            "Crawled {}: {} emails, {} social profiles",
            url,
            record.emails.len(),
            record.social.len()
        );

        record
    }

    /// Fetches and analyzes a contact or about page before `deadline`
    async fn secondary(
        &self,
        url: Option<&str>,
        kind: SecondaryPage,
        deadline: Instant,
    ) -> PageSignals {
        let Some(url) = url else {
            return PageSignals::default();
        };

        let fetch = self
            .fetcher
            .fetch_page(url, self.fetcher.timeouts().secondary_page());
        let Ok(page) = timeout_at(deadline, fetch).await else {
            tracing::debug!("Deadline reached before {:?} page {} loaded", kind, url);
            return PageSignals::default();
        };
        let Some(body) = page.body else {
            return PageSignals::default();
        };

        let analyzer = Arc::clone(&self.analyzer);
        let task = tokio::task::spawn_blocking(move || match kind {
            SecondaryPage::Contact => analyzer.contact_page(&body),
            SecondaryPage::About => analyzer.about_page(&body),
        });

        match timeout_at(deadline, task).await {
            Ok(Ok(signals)) => signals,
            Ok(Err(e)) => {
                tracing::debug!("{:?} page analysis failed for {}: {}", kind, url, e);
                PageSignals::default()
            }
            Err(_) => {
                tracing::debug!("{:?} page analysis timed out for {}", kind, url);
                PageSignals::default()
            }
        }
    }
}

#[async_trait]
impl ContactScraper for SiteCrawler {
    async fn scrape(&self, url: &str) -> ContactRecord {
        self.crawl(url).await
    }
}

/// Crawls one website with the default configuration
///
/// # Examples
///
/// ```no_run
/// # async fn run() {
/// let record = contact_scout::scrape_website("acme-widgets.io").await;
/// println!("{:?}", record.emails);
/// # }
/// ```
pub async fn scrape_website(url: &str) -> ContactRecord {
    match SiteCrawler::new(&Config::default()) {
        Ok(crawler) => crawler.scrape(url).await,
        Err(e) => {
            tracing::error!("Failed to build crawler: {}", e);
            ContactRecord::empty(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> SiteCrawler {
        SiteCrawler::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_record() {
        let record = crawler().scrape("").await;
        assert!(record.is_empty());
        assert_eq!(record.canonical_url, "");

        let record = crawler().scrape("   ").await;
        assert_eq!(record.canonical_url, "   ");
    }

    #[tokio::test]
    async fn test_invalid_url_returns_input() {
        let record = crawler().scrape("https://").await;
        assert!(record.is_empty());
        assert_eq!(record.canonical_url, "https://");
    }

    #[tokio::test]
    async fn test_bypass_domain_skips_network() {
        let record = crawler().scrape("linkedin.com/company/acme-widgets").await;
        assert!(record.is_empty());
        assert_eq!(record.canonical_url, "https://linkedin.com/company/acme-widgets");
    }

    #[tokio::test]
    async fn test_embedded_wrapper_target_is_bypass_checked() {
        let record = crawler()
            .scrape("https://www.producthunt.com/r/ABC?url=https%3A%2F%2Fgithub.com%2Facme")
            .await;
        assert!(record.is_empty());
        assert_eq!(record.canonical_url, "https://github.com/acme");
    }
}
