//! Authoritative contact collection.
//!
//! # Responsibility
//! - Own the ordered contact collection and its id uniqueness.
//! - Publish every write as a brand-new immutable snapshot.
//!
//! # Invariants
//! - Insertion order is preserved; new contacts are appended.
//! - No two contacts share an id.
//! - Snapshots handed out by [`EntityStore::get`] never change after the fact.
//! - `revision` increases on every effective write and only then.

use crate::model::contact::{Contact, ContactFormData, ContactId};
use log::warn;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Immutable, cheaply clonable collection snapshot.
pub type Collection = Arc<[Contact]>;

/// Single source of truth for contact records.
#[derive(Debug, Clone)]
pub struct EntityStore {
    contacts: Collection,
    revision: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            contacts: Arc::from(Vec::<Contact>::new()),
            revision: 0,
        }
    }
}

impl EntityStore {
    /// Creates a store holding `contacts` (duplicates after the first are dropped).
    pub fn new(contacts: Vec<Contact>) -> Self {
        let mut store = Self::default();
        store.replace_all(contacts);
        store
    }

    /// Current snapshot. Treat as read-only; later writes install new snapshots.
    pub fn get(&self) -> Collection {
        Arc::clone(&self.contacts)
    }

    /// Borrowed view of the current snapshot.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.contacts.iter().any(|contact| contact.id == id)
    }

    /// Appends a contact built from `form` under a fresh unique id.
    pub fn add(&mut self, form: ContactFormData) -> Contact {
        let contact = Contact::with_id(self.fresh_id(), form);
        self.append(contact.clone());
        contact
    }

    /// Removes the contact with `id`. Returns whether a removal occurred.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        let remaining: Vec<Contact> = self
            .contacts
            .iter()
            .filter(|contact| contact.id != id)
            .cloned()
            .collect();
        self.install(remaining);
        true
    }

    /// Replaces the whole collection, keeping the first contact of each id.
    ///
    /// Contacts with a blank id are dropped; they could never be read back.
    pub fn replace_all(&mut self, contacts: Vec<Contact>) {
        let mut seen = HashSet::with_capacity(contacts.len());
        let total = contacts.len();
        let unique: Vec<Contact> = contacts
            .into_iter()
            .filter(|contact| {
                !contact.id.trim().is_empty() && seen.insert(contact.id.clone())
            })
            .collect();
        if unique.len() != total {
            warn!(
                "event=collection_replace module=store status=dedup dropped={}",
                total - unique.len()
            );
        }
        self.install(unique);
    }

    fn append(&mut self, contact: Contact) {
        let mut next = Vec::with_capacity(self.contacts.len() + 1);
        next.extend(self.contacts.iter().cloned());
        next.push(contact);
        self.install(next);
    }

    fn install(&mut self, contacts: Vec<Contact>) {
        self.contacts = Arc::from(contacts);
        self.revision += 1;
    }

    fn fresh_id(&self) -> ContactId {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityStore;
    use crate::model::contact::{Contact, ContactFormData, Department};
    use std::sync::Arc;

    fn form(name: &str) -> ContactFormData {
        ContactFormData::new(
            name,
            format!("{}@x.com", name.to_lowercase()),
            "",
            Department::Support,
        )
    }

    fn seeded() -> EntityStore {
        EntityStore::new(vec![Contact::with_id(
            "1",
            ContactFormData::new("Ana Lopez", "ana@x.com", "", Department::Sales),
        )])
    }

    #[test]
    fn add_appends_with_fresh_unique_id() {
        let mut store = seeded();
        let added = store.add(form("Bo"));

        assert!(!added.id.is_empty());
        assert_ne!(added.id, "1");
        assert_eq!(store.len(), 2);
        assert_eq!(store.contacts().last(), Some(&added));
    }

    #[test]
    fn writes_install_new_snapshots_and_keep_old_ones_intact() {
        let mut store = seeded();
        let before = store.get();
        let revision = store.revision();

        store.add(form("Bo"));

        assert_eq!(before.len(), 1);
        assert!(!Arc::ptr_eq(&before, &store.get()));
        assert_eq!(store.revision(), revision + 1);
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let mut store = seeded();
        let before = store.get();
        let revision = store.revision();

        assert!(!store.remove("nonexistent-id"));
        assert!(Arc::ptr_eq(&before, &store.get()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn add_then_remove_restores_previous_collection() {
        let mut store = seeded();
        store.add(form("Cy"));
        let before = store.get();

        let added = store.add(form("Bo"));
        assert!(store.remove(&added.id));

        assert_eq!(&*store.get(), &*before);
    }

    #[test]
    fn replace_all_keeps_first_of_each_id() {
        let mut store = EntityStore::default();
        store.replace_all(vec![
            Contact::with_id("1", form("Ana")),
            Contact::with_id("1", form("Bo")),
            Contact::with_id("2", form("Cy")),
            Contact::with_id("", form("Dee")),
            Contact::with_id("  ", form("Eve")),
        ]);

        let names: Vec<&str> = store.contacts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Cy"]);
    }
}
