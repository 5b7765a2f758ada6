//! Batch scheduling of site crawls
//!
//! Two policies drive many crawls:
//! - [`process_batches`] runs fixed-size chunks concurrently with a pause
//!   between chunks
//! - [`extract_contact_info`] runs items one at a time up to a crawl budget
//!
//! Each crawl runs in its own task, so a panic inside one crawl becomes a
//! `Failed` item instead of tearing down the whole batch. Neither policy
//! returns an error.

use super::coordinator::ContactScraper;
use crate::model::{EnrichedItem, EnrichmentOutcome, Item};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Crawls items in concurrent chunks of `concurrency_limit`
///
/// A limit of 0 is treated as 1. `delay` is awaited between chunks, never
/// after the last one. Output order matches input order.
pub async fn process_batches(
    scraper: Arc<dyn ContactScraper>,
    items: Vec<Item>,
    concurrency_limit: usize,
    delay: Duration,
) -> Vec<EnrichedItem> {
    let chunk_size = concurrency_limit.max(1);
    let total_chunks = items.len().div_ceil(chunk_size);
    let mut results = Vec::with_capacity(items.len());

    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::info!(
            "Processing batch {}/{} ({} items)",
            index + 1,
            total_chunks,
            chunk.len()
        );

        let tasks = chunk
            .iter()
            .cloned()
            .map(|item| enrich_item(Arc::clone(&scraper), item));
        results.extend(join_all(tasks).await);
    }

    results
}

/// Crawls items one at a time until `max_count` sites have been crawled
///
/// Items without a website are returned as `MissingWebsite` and do not use
/// up the budget. Items after the budget is spent are not returned.
pub async fn extract_contact_info(
    scraper: Arc<dyn ContactScraper>,
    items: Vec<Item>,
    max_count: usize,
) -> Vec<EnrichedItem> {
    let mut results = Vec::new();
    let mut crawled = 0;

    for item in items {
        if crawled >= max_count {
            tracing::debug!("Crawl budget of {} reached", max_count);
            break;
        }

        if item.website().is_some() {
            crawled += 1;
        }
        results.push(enrich_item(Arc::clone(&scraper), item).await);
    }

    results
}

/// Crawls one item's website in its own task
async fn enrich_item(scraper: Arc<dyn ContactScraper>, item: Item) -> EnrichedItem {
    let Some(website) = item.website().map(str::to_string) else {
        tracing::debug!("Item {} has no website", item.id);
        return EnrichedItem::fallback(item, EnrichmentOutcome::MissingWebsite);
    };

    let task_item = item.clone();
    let handle = tokio::spawn(async move {
        let record = scraper.scrape(&website).await;
        EnrichedItem::enriched(task_item, &record)
    });

    match handle.await {
        Ok(enriched) => enriched,
        Err(e) => {
            tracing::error!("Crawl task for item {} failed: {}", item.id, e);
            EnrichedItem::fallback(item, EnrichmentOutcome::Failed)
        }
    }
}
