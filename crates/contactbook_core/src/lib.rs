//! Core state store for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;

pub use config::{StorageLocation, StoreConfig};
pub use logging::{
    default_log_level, flush_logging, init_logging, logging_status, LoggingError,
};
pub use model::contact::{Contact, ContactFormData, ContactId, ContactValidationError, Department};
pub use model::filter::FilterCriteria;
pub use persist::adapter::{Hydration, HydrationSource, PersistenceAdapter, SeedReason};
pub use persist::kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use persist::{PersistError, PersistResult};
pub use store::app_state::{AppState, StateChange, StateView, SubscriptionId};
pub use store::derive::{derive, derive_from_json, DerivedView};
pub use store::entity_store::{Collection, EntityStore};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
