//! Storage module for persisting monitor state and results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Seen listing ID persistence
//! - Enriched item storage
//! - Run statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{StateStore, StorageError, StorageResult};

use crate::output::RunStats;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// An enriched item as read back from storage
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub item_id: String,
    pub name: String,
    pub website: Option<String>,
    pub outcome: String,
    pub email_count: u32,
    /// The enriched item as serialized when it was saved
    pub payload: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

/// A recorded run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub stats: RunStats,
}

/// Parses an RFC 3339 timestamp written by this module
pub(crate) fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Timestamp(format!("{}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_roundtrip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(StorageError::Timestamp(_))
        ));
    }
}
