//! Output module for notifications, reports and run statistics
//!
//! This module handles:
//! - Rendering enriched items and whole runs as markdown
//! - Delivering notifications through the `Notifier` trait
//! - Tallying run statistics

mod markdown;
pub mod stats;
mod traits;
mod webhook;

pub use markdown::{format_item_markdown, format_run_markdown};
pub use stats::{print_statistics, RunStats};
pub use traits::{Notifier, OutputError, OutputResult};
pub use webhook::WebhookNotifier;
