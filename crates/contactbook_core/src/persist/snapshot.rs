//! Snapshot codec for the persisted contact collection.
//!
//! # Invariants
//! - A snapshot is a JSON array of flat contact objects in collection order.
//! - Only a value that is not a JSON array is malformed as a whole.
//! - Inside an array, invalid elements and repeated ids are dropped one by one;
//!   the first contact of each id wins.
//! - A non-empty array with no usable element counts as malformed.

use crate::model::contact::Contact;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reasons a stored snapshot cannot be hydrated.
#[derive(Debug)]
pub enum SnapshotError {
    /// Not JSON, or not a JSON array.
    Malformed(serde_json::Error),
    /// The array has elements but none of them is a valid, unique contact.
    NoUsableContacts { dropped: usize },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed contact snapshot: {err}"),
            Self::NoUsableContacts { dropped } => write!(
                f,
                "contact snapshot has no usable contacts ({dropped} dropped)"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::NoUsableContacts { .. } => None,
        }
    }
}

/// Contacts recovered from a snapshot plus how many elements were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub contacts: Vec<Contact>,
    pub dropped: usize,
}

/// Serializes the collection into its persisted representation.
pub fn encode_snapshot(contacts: &[Contact]) -> Result<String, serde_json::Error> {
    serde_json::to_string(contacts)
}

/// Parses a persisted snapshot string.
pub fn decode_snapshot(raw: &str) -> Result<DecodedSnapshot, SnapshotError> {
    let elements: Vec<Value> = serde_json::from_str(raw).map_err(SnapshotError::Malformed)?;
    salvage_contacts(&elements)
}

/// Parses an already-decoded JSON value as a snapshot.
pub fn decode_snapshot_value(value: &Value) -> Result<DecodedSnapshot, SnapshotError> {
    let elements = Vec::<Value>::deserialize(value).map_err(SnapshotError::Malformed)?;
    salvage_contacts(&elements)
}

fn salvage_contacts(elements: &[Value]) -> Result<DecodedSnapshot, SnapshotError> {
    let mut seen = HashSet::with_capacity(elements.len());
    let contacts: Vec<Contact> = elements
        .iter()
        .filter_map(|element| Contact::deserialize(element).ok())
        .filter(|contact| seen.insert(contact.id.clone()))
        .collect();
    let dropped = elements.len() - contacts.len();

    if contacts.is_empty() && dropped > 0 {
        return Err(SnapshotError::NoUsableContacts { dropped });
    }
    if dropped > 0 {
        warn!(
            "event=snapshot_decode module=persist status=partial kept={} dropped={}",
            contacts.len(),
            dropped
        );
    }
    Ok(DecodedSnapshot { contacts, dropped })
}
