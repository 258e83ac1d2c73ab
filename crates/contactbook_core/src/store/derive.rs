//! Derivation engine for filtered views.
//!
//! # Responsibility
//! - Compute the filtered collection and its count from raw state.
//! - Cache the last view and recompute only when an input revision moves.
//!
//! # Invariants
//! - `count() == contacts().len()` for every view (count is not stored).
//! - Derivation is pure: equal inputs produce equal views in the same order.
//! - Ill-formed raw input yields an empty view instead of an error.

use crate::model::contact::Contact;
use crate::model::filter::FilterCriteria;
use crate::persist::snapshot::decode_snapshot_value;
use crate::store::entity_store::EntityStore;
use crate::store::filter_store::FilterStore;
use log::{debug, warn};

/// Filtered subsequence of the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    filtered: Vec<Contact>,
}

impl DerivedView {
    /// Contacts satisfying the criteria, in collection order.
    pub fn contacts(&self) -> &[Contact] {
        &self.filtered
    }

    pub fn count(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.filtered
    }
}

/// Computes the view for `collection` under `criteria`.
pub fn derive(collection: &[Contact], criteria: &FilterCriteria) -> DerivedView {
    let needle = criteria.search.to_lowercase();
    DerivedView {
        filtered: collection
            .iter()
            .filter(|contact| criteria.matches_with_needle(contact, &needle))
            .cloned()
            .collect(),
    }
}

/// Computes the view from untyped state, e.g. a raw stored snapshot.
///
/// A value that is not a contact array derives to an empty view; invalid
/// elements inside an array are skipped.
pub fn derive_from_json(value: &serde_json::Value, criteria: &FilterCriteria) -> DerivedView {
    match decode_snapshot_value(value) {
        Ok(decoded) => derive(&decoded.contacts, criteria),
        Err(err) => {
            warn!(
                "event=derive module=store status=fallback reason=malformed_collection error={}",
                err
            );
            DerivedView::default()
        }
    }
}

/// Cached derivation keyed by input revisions.
#[derive(Debug, Default)]
pub struct DerivationEngine {
    view: DerivedView,
    inputs: Option<(u64, u64)>,
    recomputations: u64,
}

impl DerivationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes when either store changed since the last call.
    ///
    /// Returns whether a recomputation happened.
    pub fn sync(&mut self, entities: &EntityStore, filters: &FilterStore) -> bool {
        let inputs = (entities.revision(), filters.revision());
        if self.inputs == Some(inputs) {
            return false;
        }

        self.view = derive(entities.contacts(), filters.criteria());
        self.inputs = Some(inputs);
        self.recomputations += 1;
        debug!(
            "event=derive module=store status=ok entities_rev={} filters_rev={} count={}",
            inputs.0,
            inputs.1,
            self.view.count()
        );
        true
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Number of recomputations performed so far.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
