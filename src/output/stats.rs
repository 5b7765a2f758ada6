//! Run statistics
//!
//! This module tallies the outcome of one enrichment run and renders the
//! tally for the terminal.

use crate::model::{EnrichedItem, EnrichmentOutcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of one enrichment run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Items returned by the listing source (or given on the command line)
    pub items_found: usize,

    /// Items whose website was crawled
    pub items_enriched: usize,

    /// Crawled items that yielded at least one email or social profile
    pub items_with_contacts: usize,

    /// Items without a website
    pub items_skipped: usize,

    /// Items whose crawl task failed
    pub items_failed: usize,

    pub emails_found: usize,
    pub twitter_handles_found: usize,

    /// Facebook, Instagram and LinkedIn links
    pub links_found: usize,

    pub duration_ms: u64,
}

impl RunStats {
    /// Tallies the enriched items of a run
    pub fn from_results(items_found: usize, results: &[EnrichedItem], duration: Duration) -> Self {
        let mut stats = RunStats {
            items_found,
            duration_ms: duration.as_millis() as u64,
            ..Default::default()
        };

        for result in results {
            match result.outcome {
                EnrichmentOutcome::Enriched => stats.items_enriched += 1,
                EnrichmentOutcome::MissingWebsite => stats.items_skipped += 1,
                EnrichmentOutcome::Failed => stats.items_failed += 1,
            }

            if result.has_contacts() {
                stats.items_with_contacts += 1;
            }

            let contacts = &result.contacts;
            stats.emails_found += contacts.emails.len();
            stats.twitter_handles_found += contacts.twitter_handles.len();
            stats.links_found += contacts.facebook_links.len()
                + contacts.instagram_links.len()
                + contacts.linkedin_links.len();
        }

        stats
    }

    /// Share of crawled items that yielded contacts, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.items_enriched + self.items_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.items_with_contacts as f64 / attempted as f64) * 100.0
    }
}

/// Prints run statistics to stdout
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStats) {
    println!("\n=== Contact-Scout Run Statistics ===\n");
    println!("Items found:         {}", stats.items_found);
    println!("Websites crawled:    {}", stats.items_enriched);
    println!("With contacts:       {}", stats.items_with_contacts);
    println!("Skipped (no site):   {}", stats.items_skipped);
    println!("Failed:              {}", stats.items_failed);
    println!();
    println!("Emails found:        {}", stats.emails_found);
    println!("Twitter handles:     {}", stats.twitter_handles_found);
    println!("Social links:        {}", stats.links_found);
    println!();
    println!("Success rate:        {:.2}%", stats.success_rate());
    println!(
        "Duration:            {:.1}s",
        stats.duration_ms as f64 / 1000.0
    );
    println!();
}
