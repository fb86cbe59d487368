//! SQLite-backed fallback store (device-scoped, survives restarts).
//!
//! # Invariants
//! - Only migrated connections are accepted (`open_db*` guarantees this).
//! - `set` is an upsert; `remove` of an absent key is a no-op.

use super::{FallbackStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Fallback store persisting entries in the `cache_entries` table.
pub struct SqliteFallbackStore {
    conn: Mutex<Connection>,
}

impl SqliteFallbackStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the cache file at `path`, creating and migrating it if needed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl FallbackStore for SqliteFallbackStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM cache_entries WHERE cache_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO cache_entries (cache_key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(cache_key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=cache_write module=store status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute("DELETE FROM cache_entries WHERE cache_key = ?1;", [key])?;
        Ok(())
    }
}
