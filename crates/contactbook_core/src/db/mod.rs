//! SQLite storage bootstrap for the durable key-value slot.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the persistence adapter.
//! - Apply the schema migration before any slot is read or written.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is rejected, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening the store database or touching the slot table.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the database (`mode` is `file` or `memory`).
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// A schema step failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer binary.
    SchemaTooNew { found: u32, supported: u32 },
    /// Any other statement against `key_value`.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "cannot open {mode} contact database: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "key-value schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "key-value slot query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
