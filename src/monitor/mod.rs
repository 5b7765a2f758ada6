//! New-item monitor
//!
//! One monitor run:
//! 1. Pages through recent listing items, with retries and pacing
//! 2. Drops IDs it has already seen
//! 3. Crawls each new item's website for contacts
//! 4. Sends one notification per item
//! 5. Persists the seen IDs, the results and the run statistics
//!
//! `check_for_new_items` takes `&mut self`, so two runs of the same monitor
//! can never overlap.

mod source;

pub use source::{ListingFilter, ListingPage, ListingSource};

use crate::config::{Config, MonitorConfig};
use crate::crawler::{extract_contact_info, ContactScraper};
use crate::model::{EnrichedItem, Item};
use crate::output::{Notifier, RunStats};
use crate::state::SeenIds;
use crate::storage::{StateStore, StorageResult};
use crate::ScoutError;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Result of one monitor run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Newly seen items after enrichment
    pub new_items: Vec<EnrichedItem>,
    pub notifications_sent: usize,
    pub stats: RunStats,
}

/// Polls a listing source and enriches items it has not seen before
pub struct Monitor {
    config: MonitorConfig,
    source: Arc<dyn ListingSource>,
    scraper: Arc<dyn ContactScraper>,
    notifier: Option<Arc<dyn Notifier>>,
    // Mutex keeps the monitor Sync so its futures can be spawned
    store: Option<Mutex<Box<dyn StateStore>>>,
    seen: SeenIds,
    last_run: Option<DateTime<Utc>>,
}

impl Monitor {
    pub fn new(
        config: &Config,
        source: Arc<dyn ListingSource>,
        scraper: Arc<dyn ContactScraper>,
    ) -> Self {
        let monitor = &config.monitor;
        Self {
            config: monitor.clone(),
            source,
            scraper,
            notifier: None,
            store: None,
            seen: SeenIds::new(monitor.seen_capacity, monitor.seen_retain),
            last_run: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Attaches a store and restores the seen IDs and last run time from it
    ///
    /// A store that cannot be read is still attached; the monitor then
    /// starts with an empty seen set.
    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        match store.load_seen_ids() {
            Ok(ids) => {
                tracing::info!("Restored {} seen IDs", ids.len());
                self.seen =
                    SeenIds::from_ids(ids, self.config.seen_capacity, self.config.seen_retain);
            }
            Err(e) => tracing::error!("Failed to load seen IDs: {}", e),
        }

        match store.get_latest_run() {
            Ok(run) => self.last_run = run.map(|r| r.recorded_at),
            Err(e) => tracing::error!("Failed to load latest run: {}", e),
        }

        self.store = Some(Mutex::new(store));
        self
    }

    pub fn seen(&self) -> &SeenIds {
        &self.seen
    }

    /// Seeds the seen set from the last `days_back` days of the listing
    ///
    /// Clears the current seen IDs, then records every listed ID without
    /// crawling or notifying. The next run only reports items posted after
    /// seeding. The minimum run interval is not affected.
    ///
    /// Returns the number of IDs now tracked.
    pub async fn initialize(&mut self, days_back: u32) -> crate::Result<usize> {
        let filter = ListingFilter::recent(days_back, self.config.page_size);
        let listed = self.fetch_listing(&filter).await?;

        self.seen = SeenIds::new(self.config.seen_capacity, self.config.seen_retain);
        for item in listed {
            self.seen.insert(item.id);
        }

        if let Some(store) = self.store.as_mut() {
            let store = match store.get_mut() {
                Ok(store) => store,
                Err(poisoned) => poisoned.into_inner(),
            };
            log_storage_error("save seen IDs", store.save_seen_ids(&self.seen));
        }

        tracing::info!(
            "Seeded {} seen IDs from the last {} days",
            self.seen.len(),
            days_back
        );
        Ok(self.seen.len())
    }

    /// Runs one poll-enrich-notify-persist cycle
    ///
    /// New IDs are marked seen before they are crawled, so delivery is at
    /// most once: an item whose notification fails is not retried later.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run completed (possibly with no new items)
    /// * `Err(ScoutError::RunTooSoon)` - The previous run was too recent
    /// * `Err(ScoutError::Listing)` - Not even the first listing page could be fetched
    pub async fn check_for_new_items(&mut self) -> crate::Result<RunReport> {
        self.ensure_interval()?;

        let started = Instant::now();
        self.last_run = Some(Utc::now());

        let filter = ListingFilter::recent(self.config.lookback_days, self.config.page_size);
        let listed = self.fetch_listing(&filter).await?;
        let listed_count = listed.len();
        let new_items: Vec<Item> = listed
            .into_iter()
            .filter(|item| self.seen.insert(item.id.clone()))
            .collect();

        tracing::info!(
            "Listing returned {} items, {} new",
            listed_count,
            new_items.len()
        );

        let budget = new_items.len();
        let mut enriched = extract_contact_info(Arc::clone(&self.scraper), new_items, budget).await;
        for item in &mut enriched {
            if let Some(exact) = &item.contacts.exact_website_url {
                item.item.website = Some(exact.clone());
            }
        }

        let notifications_sent = self.notify_all(&enriched).await;
        let stats = RunStats::from_results(enriched.len(), &enriched, started.elapsed());

        self.persist(&enriched, &stats);

        tracing::info!(
            "Run finished: {} new items, {} with contacts, {} notifications sent",
            stats.items_found,
            stats.items_with_contacts,
            notifications_sent
        );

        Ok(RunReport {
            new_items: enriched,
            notifications_sent,
            stats,
        })
    }

    fn ensure_interval(&self) -> crate::Result<()> {
        let Some(last) = self.last_run else {
            return Ok(());
        };

        let min_interval = chrono::Duration::milliseconds(self.config.min_interval_ms as i64);
        let elapsed = Utc::now() - last;
        if elapsed < min_interval {
            let remaining = (min_interval - elapsed).num_milliseconds().max(0) as u64;
            return Err(ScoutError::RunTooSoon {
                wait_secs: remaining.div_ceil(1000),
            });
        }
        Ok(())
    }

    /// Pages through the listing
    ///
    /// A page that still fails after every retry ends pagination. The run
    /// fails only when that happens on the first page.
    async fn fetch_listing(&self, filter: &ListingFilter) -> crate::Result<Vec<Item>> {
        let page_delay = Duration::from_millis(self.config.page_delay_ms);
        let mut cursor: Option<String> = None;
        let mut items = Vec::new();

        for page_index in 0..self.config.max_pages {
            if page_index > 0 && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }

            let page = match self.fetch_page_with_retry(filter, cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) if page_index > 0 => {
                    tracing::warn!("Stopping pagination at page {}: {}", page_index + 1, e);
                    break;
                }
                Err(e) => return Err(e),
            };

            tracing::debug!("Listing page {} held {} items", page_index + 1, page.items.len());
            items.extend(page.items);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn fetch_page_with_retry(
        &self,
        filter: &ListingFilter,
        cursor: Option<&str>,
    ) -> crate::Result<ListingPage> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            match self.source.fetch_listing_page(filter, cursor).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt < attempts => {
                    let backoff = Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt));
                    tracing::warn!(
                        "Listing fetch failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt,
                        attempts,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn notify_all(&self, items: &[EnrichedItem]) -> usize {
        let Some(notifier) = &self.notifier else {
            return 0;
        };

        let stagger = Duration::from_millis(self.config.notify_stagger_ms);
        let mut sent = 0;
        for (index, item) in items.iter().enumerate() {
            if index > 0 && !stagger.is_zero() {
                tokio::time::sleep(stagger).await;
            }
            if notifier.notify(item).await {
                sent += 1;
            }
        }
        sent
    }

    fn persist(&mut self, items: &[EnrichedItem], stats: &RunStats) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let store = match store.get_mut() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        };

        log_storage_error("save seen IDs", store.save_seen_ids(&self.seen));
        for item in items {
            log_storage_error("save enriched item", store.save_enriched_item(item));
        }
        log_storage_error("record run", store.record_run(stats).map(|_| ()));
    }
}

fn log_storage_error(action: &str, result: StorageResult<()>) {
    if let Err(e) = result {
        tracing::error!("Failed to {}: {}", action, e);
    }
}
