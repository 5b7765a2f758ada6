//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::EnrichedItem;
use crate::output::RunStats;
use crate::state::SeenIds;
use crate::storage::{RunRecord, StoredItem};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp in database: {0}")]
    Timestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines every persistence operation the monitor and the CLI
/// need. Calls are synchronous and expected to be quick.
pub trait StateStore: Send {
    // ===== Seen IDs =====

    /// Loads the seen listing IDs, oldest first
    fn load_seen_ids(&self) -> StorageResult<Vec<String>>;

    /// Replaces the stored seen IDs with the contents of `seen`
    fn save_seen_ids(&mut self, seen: &SeenIds) -> StorageResult<()>;

    // ===== Enriched Items =====

    /// Inserts or replaces the result for one item
    fn save_enriched_item(&mut self, item: &EnrichedItem) -> StorageResult<()>;

    /// Loads up to `limit` results, most recently saved first
    fn load_enriched_items(&self, limit: usize) -> StorageResult<Vec<StoredItem>>;

    /// Counts stored results
    fn count_enriched_items(&self) -> StorageResult<u64>;

    // ===== Runs =====

    /// Records the statistics of a finished run
    ///
    /// # Returns
    ///
    /// The ID of the new run row
    fn record_run(&mut self, stats: &RunStats) -> StorageResult<i64>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
