//! Output traits and error types
//!
//! This module defines the notifier interface and the errors raised while
//! rendering or delivering output.

use crate::model::EnrichedItem;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook rejected the notification with status {0}")]
    Status(u16),

    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Delivers a notification for one enriched item
///
/// Delivery is best-effort. Implementations log their own failures and
/// report only whether the notification went out.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, item: &EnrichedItem) -> bool;
}
