//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the StateStore trait.

use crate::model::EnrichedItem;
use crate::output::RunStats;
use crate::state::SeenIds;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StateStore, StorageResult};
use crate::storage::{parse_timestamp, RunRecord, StoredItem};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStore {
    // ===== Seen IDs =====

    fn load_seen_ids(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT item_id FROM seen_ids ORDER BY position ASC")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(ids)
    }

    fn save_seen_ids(&mut self, seen: &SeenIds) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM seen_ids", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO seen_ids (position, item_id) VALUES (?1, ?2)")?;
            for (position, id) in seen.iter().enumerate() {
                stmt.execute(params![position as i64, id])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Saved {} seen IDs", seen.len());
        Ok(())
    }

    // ===== Enriched Items =====

    fn save_enriched_item(&mut self, item: &EnrichedItem) -> StorageResult<()> {
        let payload = serde_json::to_string(item)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO enriched_items (item_id, name, website, outcome, email_count, payload, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(item_id) DO UPDATE SET
                name = excluded.name,
                website = excluded.website,
                outcome = excluded.outcome,
                email_count = excluded.email_count,
                payload = excluded.payload,
                saved_at = excluded.saved_at",
            params![
                item.id(),
                item.item.name,
                item.contacts
                    .exact_website_url
                    .as_deref()
                    .or_else(|| item.item.website()),
                item.outcome.as_str(),
                item.contacts.emails.len() as i64,
                payload,
                now,
            ],
        )?;

        Ok(())
    }

    fn load_enriched_items(&self, limit: usize) -> StorageResult<Vec<StoredItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, name, website, outcome, email_count, payload, saved_at
             FROM enriched_items ORDER BY saved_at DESC, rowid DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for (item_id, name, website, outcome, email_count, payload, saved_at) in rows {
            items.push(StoredItem {
                item_id,
                name,
                website,
                outcome,
                email_count,
                payload: serde_json::from_str(&payload)?,
                saved_at: parse_timestamp(&saved_at)?,
            });
        }

        Ok(items)
    }

    fn count_enriched_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM enriched_items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Runs =====

    fn record_run(&mut self, stats: &RunStats) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (recorded_at, items_found, items_enriched, items_with_contacts,
                               items_skipped, items_failed, emails_found, twitter_handles_found,
                               links_found, duration_ms, success_rate)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                now,
                stats.items_found as i64,
                stats.items_enriched as i64,
                stats.items_with_contacts as i64,
                stats.items_skipped as i64,
                stats.items_failed as i64,
                stats.emails_found as i64,
                stats.twitter_handles_found as i64,
                stats.links_found as i64,
                stats.duration_ms as i64,
                stats.success_rate(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, recorded_at, items_found, items_enriched, items_with_contacts,
                        items_skipped, items_failed, emails_found, twitter_handles_found,
                        links_found, duration_ms
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let count = |index: usize| row.get::<_, i64>(index).map(|v| v as usize);
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        RunStats {
                            items_found: count(2)?,
                            items_enriched: count(3)?,
                            items_with_contacts: count(4)?,
                            items_skipped: count(5)?,
                            items_failed: count(6)?,
                            emails_found: count(7)?,
                            twitter_handles_found: count(8)?,
                            links_found: count(9)?,
                            duration_ms: row.get::<_, i64>(10)? as u64,
                        },
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, recorded_at, stats)) => Ok(Some(RunRecord {
                id,
                recorded_at: parse_timestamp(&recorded_at)?,
                stats,
            })),
            None => Ok(None),
        }
    }
}
