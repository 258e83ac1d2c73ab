//! Durable key-value slots backing the persistence adapter.
//!
//! # Responsibility
//! - Define the minimal storage contract the adapter needs.
//! - Provide the SQLite implementation and an in-memory one for tests/demos.
//!
//! # Invariants
//! - `set` replaces any prior value under the same key (whole-value overwrite).
//! - `remove` of an absent key is not an error.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::persist::{PersistError, PersistResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Storage contract for string values under string keys.
///
/// Implementations are moved onto the background writer thread, hence `Send`.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
    /// Returns whether a value was removed.
    fn remove(&mut self, key: &str) -> PersistResult<bool>;
}

/// SQLite-backed key-value store over the `key_value` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO key_value (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM key_value WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// In-memory key-value store.
///
/// Clones share the same slots, so a test can keep a handle while the writer
/// thread owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    slots: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a store pre-populated with one slot.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.lock().insert(key.to_string(), value.to_string());
        store
    }

    /// Makes subsequent `set`/`remove` calls fail, simulating an I/O outage.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads a slot directly, bypassing the writer queue.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map still holds consistent whole values.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> PersistResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistError::Backend(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.peek(key))
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.check_writable()?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistResult<bool> {
        self.check_writable()?;
        Ok(self.lock().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

    #[test]
    fn sqlite_store_overwrites_and_removes_slots() {
        let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.get("contacts").unwrap(), None);

        store.set("contacts", "[]").unwrap();
        store.set("contacts", "[1]").unwrap();
        assert_eq!(store.get("contacts").unwrap().as_deref(), Some("[1]"));

        assert!(store.remove("contacts").unwrap());
        assert!(!store.remove("contacts").unwrap());
        assert_eq!(store.get("contacts").unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_slots() {
        let observer = MemoryKeyValueStore::new();
        let mut writer = observer.clone();

        writer.set("contacts", "[]").unwrap();
        assert_eq!(observer.peek("contacts").as_deref(), Some("[]"));
    }

    #[test]
    fn memory_store_can_simulate_write_failures() {
        let mut store = MemoryKeyValueStore::with_value("contacts", "[]");
        store.set_fail_writes(true);

        assert!(store.set("contacts", "[1]").is_err());
        assert!(store.remove("contacts").is_err());
        assert_eq!(store.get("contacts").unwrap().as_deref(), Some("[]"));
    }
}
