//! Search/filter criteria applied to the contact collection.
//!
//! # Invariants
//! - `search` is stored verbatim; case folding happens at match time.
//! - `department == None` means "no department filter".
//! - Criteria are session-scoped and never persisted.

use crate::model::contact::{Contact, Department};

/// Current search text and department selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub department: Option<Department>,
}

impl FilterCriteria {
    /// Returns whether both fields hold their defaults.
    pub fn is_cleared(&self) -> bool {
        self.search.is_empty() && self.department.is_none()
    }

    /// Returns whether `contact` satisfies these criteria.
    ///
    /// Search matches `name` or `email` as a case-insensitive substring; an
    /// empty search matches everything. The department clause is ANDed.
    pub fn matches(&self, contact: &Contact) -> bool {
        self.matches_with_needle(contact, &self.search.to_lowercase())
    }

    /// Same as [`FilterCriteria::matches`] with a pre-lowercased needle, so
    /// derivation folds the search text once per pass.
    pub(crate) fn matches_with_needle(&self, contact: &Contact, needle: &str) -> bool {
        let matches_search = needle.is_empty()
            || contact.name.to_lowercase().contains(needle)
            || contact.email.to_lowercase().contains(needle);
        let matches_department = self
            .department
            .map_or(true, |department| contact.department == department);

        matches_search && matches_department
    }
}
