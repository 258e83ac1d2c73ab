//! Persistence adapter mirroring the entity store into a durable slot.
//!
//! # Responsibility
//! - Hydrate the collection at startup, falling back to seed data.
//! - Mirror every collection change as a whole-snapshot overwrite.
//! - Clear the slot on `reset`.
//!
//! # Invariants
//! - Hydration never wipes the slot; it only reads.
//! - The in-memory collection stays authoritative: write failures are logged,
//!   never surfaced to the mutation caller.
//! - Writes are dispatched without waiting; `flush` is the only barrier.

use crate::config::{StorageLocation, StoreConfig};
use crate::model::contact::Contact;
use crate::persist::kv_store::{KeyValueStore, SqliteKeyValueStore};
use crate::persist::seed::bundled_seed;
use crate::persist::snapshot::{decode_snapshot, encode_snapshot};
use crate::persist::writer::SnapshotWriter;
use crate::persist::PersistResult;
use log::{error, info, warn};
use std::time::Instant;

/// Why hydration fell back to seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReason {
    /// No value stored under the key.
    Empty,
    /// Stored value is not a well-formed contact array.
    Malformed,
    /// The storage read itself failed.
    ReadFailed,
}

/// Origin of a hydrated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    Stored,
    Seed(SeedReason),
}

/// Result of reading the durable slot at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    pub contacts: Vec<Contact>,
    pub source: HydrationSource,
}

/// Durable mirror of the entity store.
pub struct PersistenceAdapter {
    writer: SnapshotWriter,
    key: String,
    seed: Vec<Contact>,
}

impl PersistenceAdapter {
    /// Opens the storage described by `config`.
    pub fn open(config: &StoreConfig) -> PersistResult<Self> {
        let store = match &config.storage {
            StorageLocation::File(path) => SqliteKeyValueStore::open(path)?,
            StorageLocation::InMemory => SqliteKeyValueStore::open_in_memory()?,
        };
        Self::with_store(config, store)
    }

    /// Uses a caller-provided store, e.g. `MemoryKeyValueStore` in tests.
    pub fn with_store(
        config: &StoreConfig,
        store: impl KeyValueStore + 'static,
    ) -> PersistResult<Self> {
        let writer = SnapshotWriter::spawn(Box::new(store))?;
        let seed = config.seed.clone().unwrap_or_else(bundled_seed);
        Ok(Self {
            writer,
            key: config.storage_key.clone(),
            seed,
        })
    }

    /// Seed dataset used for fallback and reset.
    pub fn seed(&self) -> &[Contact] {
        &self.seed
    }

    /// Reads the slot and decides which collection to start from.
    ///
    /// Never fails: every problem degrades to the seed dataset.
    pub fn hydrate(&self) -> Hydration {
        let started_at = Instant::now();
        let hydration = match self.writer.read(&self.key) {
            Ok(Some(raw)) => match decode_snapshot(&raw) {
                Ok(decoded) => {
                    if decoded.dropped > 0 {
                        warn!(
                            "event=hydrate module=persist status=partial key={} dropped={}",
                            self.key, decoded.dropped
                        );
                    }
                    Hydration {
                        contacts: decoded.contacts,
                        source: HydrationSource::Stored,
                    }
                }
                Err(err) => {
                    warn!(
                        "event=hydrate module=persist status=fallback key={} reason=malformed error={}",
                        self.key, err
                    );
                    self.seed_hydration(SeedReason::Malformed)
                }
            },
            Ok(None) => self.seed_hydration(SeedReason::Empty),
            Err(err) => {
                error!(
                    "event=hydrate module=persist status=fallback key={} reason=read_failed error={}",
                    self.key, err
                );
                self.seed_hydration(SeedReason::ReadFailed)
            }
        };

        info!(
            "event=hydrate module=persist status=ok key={} source={:?} count={} duration_ms={}",
            self.key,
            hydration.source,
            hydration.contacts.len(),
            started_at.elapsed().as_millis()
        );
        hydration
    }

    /// Dispatches a whole-snapshot overwrite of the slot.
    ///
    /// Returns once the snapshot is queued; failures are logged only.
    pub fn persist(&self, contacts: &[Contact]) {
        let raw = match encode_snapshot(contacts) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=snapshot_encode module=persist status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };
        if let Err(err) = self.writer.write(&self.key, raw) {
            error!(
                "event=snapshot_dispatch module=persist status=error key={} error={}",
                self.key, err
            );
        }
    }

    /// Dispatches removal of the slot.
    pub fn clear(&self) {
        if let Err(err) = self.writer.remove(&self.key) {
            error!(
                "event=snapshot_clear module=persist status=error key={} error={}",
                self.key, err
            );
        }
    }

    /// Waits until every dispatched write and clear has been applied.
    pub fn flush(&self) -> PersistResult<()> {
        self.writer.flush()
    }

    /// Flushes and stops the background writer.
    pub fn shutdown(self) {
        if let Err(err) = self.writer.flush() {
            warn!(
                "event=adapter_shutdown module=persist status=error error={}",
                err
            );
        }
        self.writer.shutdown();
    }

    fn seed_hydration(&self, reason: SeedReason) -> Hydration {
        Hydration {
            contacts: self.seed.clone(),
            source: HydrationSource::Seed(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HydrationSource, PersistenceAdapter, SeedReason};
    use crate::config::StoreConfig;
    use crate::model::contact::{Contact, ContactFormData, Department};
    use crate::persist::kv_store::MemoryKeyValueStore;

    fn seed() -> Vec<Contact> {
        vec![Contact::with_id(
            "1",
            ContactFormData::new("Ana Lopez", "ana@x.com", "", Department::Sales),
        )]
    }

    fn config() -> StoreConfig {
        StoreConfig::in_memory().with_seed(seed())
    }

    #[test]
    fn empty_slot_hydrates_from_seed_without_writing() {
        let store = MemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::with_store(&config(), store.clone()).unwrap();

        let hydration = adapter.hydrate();
        assert_eq!(hydration.source, HydrationSource::Seed(SeedReason::Empty));
        assert_eq!(hydration.contacts, seed());

        adapter.flush().unwrap();
        assert_eq!(store.peek("contacts"), None);
    }

    #[test]
    fn malformed_slot_hydrates_from_seed_and_is_left_untouched() {
        let store = MemoryKeyValueStore::with_value("contacts", "{\"not\":\"an array\"}");
        let adapter = PersistenceAdapter::with_store(&config(), store.clone()).unwrap();

        let hydration = adapter.hydrate();
        assert_eq!(
            hydration.source,
            HydrationSource::Seed(SeedReason::Malformed)
        );
        assert_eq!(hydration.contacts, seed());
        assert_eq!(
            store.peek("contacts").as_deref(),
            Some("{\"not\":\"an array\"}")
        );
    }

    #[test]
    fn persist_then_hydrate_roundtrips() {
        let store = MemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::with_store(&config(), store).unwrap();
        let mut contacts = seed();
        contacts.push(Contact::from_form(ContactFormData::new(
            "Bo",
            "bo@x.com",
            "",
            Department::Support,
        )));

        adapter.persist(&contacts);
        let hydration = adapter.hydrate();

        assert_eq!(hydration.source, HydrationSource::Stored);
        assert_eq!(hydration.contacts, contacts);
    }

    #[test]
    fn invalid_elements_are_skipped_and_the_slot_is_left_untouched() {
        let raw = r#"[{"id":"9","name":"Zoe","email":"zoe@x.com","department":"Soporte"},{"id":"","name":"","email":"nope","department":"Ventas"}]"#;
        let store = MemoryKeyValueStore::with_value("contacts", raw);
        let adapter = PersistenceAdapter::with_store(&config(), store.clone()).unwrap();

        let hydration = adapter.hydrate();
        assert_eq!(hydration.source, HydrationSource::Stored);
        assert_eq!(hydration.contacts.len(), 1);
        assert_eq!(hydration.contacts[0].id, "9");

        adapter.flush().unwrap();
        assert_eq!(store.peek("contacts").as_deref(), Some(raw));
    }

    #[test]
    fn stored_empty_array_is_not_replaced_by_seed() {
        let store = MemoryKeyValueStore::with_value("contacts", "[]");
        let adapter = PersistenceAdapter::with_store(&config(), store).unwrap();

        let hydration = adapter.hydrate();
        assert_eq!(hydration.source, HydrationSource::Stored);
        assert!(hydration.contacts.is_empty());
    }

    #[test]
    fn clear_removes_the_slot() {
        let store = MemoryKeyValueStore::with_value("contacts", "[]");
        let adapter = PersistenceAdapter::with_store(&config(), store.clone()).unwrap();

        adapter.clear();
        adapter.flush().unwrap();
        assert_eq!(store.peek("contacts"), None);
    }

    #[test]
    fn custom_storage_key_is_honored() {
        let store = MemoryKeyValueStore::new();
        let adapter = PersistenceAdapter::with_store(
            &config().with_storage_key("contacts-test"),
            store.clone(),
        )
        .unwrap();

        adapter.persist(&seed());
        adapter.flush().unwrap();
        assert!(store.peek("contacts-test").is_some());
        assert!(store.peek("contacts").is_none());
    }
}
