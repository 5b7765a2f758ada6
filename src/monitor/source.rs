//! Listing source interface
//!
//! The listing API client lives outside this crate. The monitor only needs
//! cursor-paged access to recent items.

use crate::model::Item;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Which listing items to request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    /// Only items posted at or after this instant
    pub posted_after: DateTime<Utc>,
    pub page_size: u32,
}

impl ListingFilter {
    /// Items posted within the last `lookback_days` days
    pub fn recent(lookback_days: u32, page_size: u32) -> Self {
        Self {
            posted_after: Utc::now() - Duration::days(i64::from(lookback_days)),
            page_size,
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub items: Vec<Item>,
    /// Cursor for the next page
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Cursor-paged access to a product listing
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches the page after `cursor`, or the first page when `cursor` is None
    async fn fetch_listing_page(
        &self,
        filter: &ListingFilter,
        cursor: Option<&str>,
    ) -> crate::Result<ListingPage>;
}
