//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Contact-Scout
//! database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Listing IDs already handled, oldest first
CREATE TABLE IF NOT EXISTS seen_ids (
    position INTEGER PRIMARY KEY,
    item_id TEXT NOT NULL UNIQUE
);

-- Latest enrichment result per listing item
CREATE TABLE IF NOT EXISTS enriched_items (
    item_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    website TEXT,
    outcome TEXT NOT NULL,
    email_count INTEGER NOT NULL DEFAULT 0,
    payload TEXT NOT NULL,
    saved_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_enriched_items_saved_at ON enriched_items(saved_at);

-- One row per monitor or CLI run
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at TEXT NOT NULL,
    items_found INTEGER NOT NULL,
    items_enriched INTEGER NOT NULL,
    items_with_contacts INTEGER NOT NULL,
    items_skipped INTEGER NOT NULL,
    items_failed INTEGER NOT NULL,
    emails_found INTEGER NOT NULL,
    twitter_handles_found INTEGER NOT NULL,
    links_found INTEGER NOT NULL,
    duration_ms INTEGER NOT NULL,
    success_rate REAL NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
