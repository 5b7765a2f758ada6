//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the redirect-following and the manual-redirect clients
//! - Rotating User-Agent strings and cache-busting headers
//! - Per-call timeouts, including a separate budget for reading bodies
//! - Error classification into timeouts and transport failures

use crate::config::{Config, TimeoutConfig};
use crate::ScoutError;
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::{redirect::Policy, Client, RequestBuilder, Response};
use std::time::Duration;

/// Outcome of fetching one page, never an error
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// True for a 2xx response whose body was read
    pub ok: bool,
    /// HTTP status code, if a response arrived
    pub status: Option<u16>,
    /// Final URL after redirects (the request URL when no response arrived)
    pub final_url: String,
    pub body: Option<String>,
}

impl FetchResult {
    fn failed(url: &str, status: Option<u16>) -> Self {
        Self {
            ok: false,
            status,
            final_url: url.to_string(),
            body: None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `redirects` - Redirect policy (`Policy::limited(n)` or `Policy::none()`)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(redirects: Policy) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirects)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared HTTP access for every crawl step
#[derive(Debug, Clone)]
pub struct Fetcher {
    following: Client,
    manual: Client,
    user_agents: Vec<String>,
    timeouts: TimeoutConfig,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        Ok(Self {
            following: build_http_client(Policy::limited(config.crawler.max_redirects))?,
            manual: build_http_client(Policy::none())?,
            user_agents: config.crawler.user_agents.clone(),
            timeouts: config.timeouts.clone(),
        })
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Picks a User-Agent at random from the configured pool
    fn user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0")
    }

    fn request(&self, client: &Client, url: &str, timeout: Duration) -> RequestBuilder {
        client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT, "text/html")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
    }

    /// GET following redirects
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<Response, ScoutError> {
        let request = self.request(&self.following, url, timeout);
        request.send().await.map_err(|e| classify_error(url, e))
    }

    /// GET that returns 3xx responses as-is
    pub async fn fetch_manual(&self, url: &str, timeout: Duration) -> Result<Response, ScoutError> {
        let request = self.request(&self.manual, url, timeout);
        request.send().await.map_err(|e| classify_error(url, e))
    }

    /// Reads a response body, racing it against `timeout`
    pub async fn read_body(&self, response: Response, timeout: Duration) -> Result<String, ScoutError> {
        let url = response.url().to_string();
        match tokio::time::timeout(timeout, response.text()).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => Err(classify_error(&url, e)),
            Err(_) => Err(ScoutError::Timeout { url }),
        }
    }

    /// Fetches and reads a page, folding every failure into `ok: false`
    pub async fn fetch_page(&self, url: &str, timeout: Duration) -> FetchResult {
        let response = match self.fetch(url, timeout).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                return FetchResult::failed(url, None);
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            tracing::debug!("Non-success status {} for {}", status.as_u16(), url);
            return FetchResult {
                final_url,
                ..FetchResult::failed(url, Some(status.as_u16()))
            };
        }

        let body_budget = timeout.min(self.timeouts.body_read());
        match self.read_body(response, body_budget).await {
            Ok(body) => FetchResult {
                ok: true,
                status: Some(status.as_u16()),
                final_url,
                body: Some(body),
            },
            Err(e) => {
                tracing::warn!("Body read failed for {}: {}", url, e);
                FetchResult {
                    final_url,
                    ..FetchResult::failed(url, Some(status.as_u16()))
                }
            }
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> ScoutError {
    if error.is_timeout() {
        ScoutError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScoutError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
