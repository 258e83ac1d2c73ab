//! Durable persistence for the contact collection.
//!
//! # Responsibility
//! - Mirror the entity store into one key-value slot as a JSON snapshot.
//! - Rehydrate at startup with seed fallback.
//! - Keep storage I/O off the mutation path.
//!
//! # Invariants
//! - The slot holds a whole snapshot; there are no incremental records.
//! - Persistence errors never corrupt or roll back in-memory state.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod adapter;
pub mod kv_store;
pub mod seed;
pub mod snapshot;
mod writer;

pub type PersistResult<T> = Result<T, PersistError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    /// Non-SQLite backend failure.
    Backend(String),
    /// Writer thread could not be started.
    Io(std::io::Error),
    /// Writer thread is gone; queued commands cannot be delivered.
    WriterClosed,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
            Self::Io(err) => write!(f, "failed to start snapshot writer: {err}"),
            Self::WriterClosed => write!(f, "snapshot writer is not running"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Backend(_) | Self::WriterClosed => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
