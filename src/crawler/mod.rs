//! Crawler module for website contact discovery
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with per-call timeouts
//! - Redirect-wrapper resolution and canonical URL discovery
//! - Synchronous page analysis on blocking threads
//! - Single-site orchestration and the batch policies

mod analysis;
mod coordinator;
mod fetcher;
mod resolver;
mod scheduler;

pub use analysis::{MainPageAnalysis, PageAnalyzer, PageSignals};
pub use coordinator::{scrape_website, ContactScraper, SiteCrawler};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use resolver::{find_canonical_url, resolve_redirect};
pub use scheduler::{extract_contact_info, process_batches};
