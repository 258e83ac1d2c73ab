//! Store configuration.
//!
//! # Invariants
//! - The storage key defaults to `contacts` and is fixed for the process.
//! - A custom seed replaces the bundled dataset for both hydration fallback
//!   and `reset`.

use crate::model::contact::Contact;
use std::path::PathBuf;
use std::time::Duration;

/// Durable slot key holding the serialized collection.
pub const DEFAULT_STORAGE_KEY: &str = "contacts";
/// Length of the simulated loading window after `initialize`/`refresh`.
pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(1000);
/// Database file name used when no path is given.
pub const DEFAULT_DB_FILE_NAME: &str = "contactbook.sqlite3";

/// Where the durable key-value slot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// SQLite database file, created when missing.
    File(PathBuf),
    /// Private in-memory SQLite database; nothing survives the process.
    InMemory,
}

/// Configuration consumed by [`crate::AppState::init`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub storage: StorageLocation,
    pub storage_key: String,
    pub loading_delay: Duration,
    /// `None` uses the bundled seed dataset.
    pub seed: Option<Vec<Contact>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageLocation::InMemory,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            loading_delay: DEFAULT_LOADING_DELAY,
            seed: None,
        }
    }
}

impl StoreConfig {
    /// Config backed by a SQLite file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// Config backed by an in-memory SQLite database.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_loading_delay(mut self, delay: Duration) -> Self {
        self.loading_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: Vec<Contact>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
