//! Session-scoped filter criteria.
//!
//! # Invariants
//! - Search text is stored verbatim.
//! - `clear` resets both fields in a single write.
//! - `revision` only moves when the criteria value actually changes.

use crate::model::contact::Department;
use crate::model::filter::FilterCriteria;

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    criteria: FilterCriteria,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns whether the criteria changed.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.criteria.search == text {
            return false;
        }
        self.write(FilterCriteria {
            search: text,
            department: self.criteria.department,
        })
    }

    /// `None` clears the department filter. Returns whether the criteria changed.
    pub fn set_department(&mut self, department: Option<Department>) -> bool {
        if self.criteria.department == department {
            return false;
        }
        self.write(FilterCriteria {
            search: self.criteria.search.clone(),
            department,
        })
    }

    /// Resets to defaults. Returns whether the criteria changed.
    pub fn clear(&mut self) -> bool {
        if self.criteria.is_cleared() {
            return false;
        }
        self.write(FilterCriteria::default())
    }

    fn write(&mut self, criteria: FilterCriteria) -> bool {
        self.criteria = criteria;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::FilterStore;
    use crate::model::contact::Department;
    use crate::model::filter::FilterCriteria;

    #[test]
    fn setters_keep_the_other_field() {
        let mut store = FilterStore::new();
        store.set_search("  Ana ");
        store.set_department(Some(Department::Marketing));

        assert_eq!(store.criteria().search, "  Ana ");
        assert_eq!(store.criteria().department, Some(Department::Marketing));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = FilterStore::new();
        store.set_search("ana");
        store.set_department(Some(Department::Sales));

        assert!(store.clear());
        let once = store.criteria().clone();
        let revision = store.revision();

        assert!(!store.clear());
        assert_eq!(store.criteria(), &once);
        assert_eq!(store.criteria(), &FilterCriteria::default());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn unchanged_values_do_not_bump_revision() {
        let mut store = FilterStore::new();
        assert!(!store.set_search(""));
        assert!(!store.set_department(None));
        assert_eq!(store.revision(), 0);

        assert!(store.set_search("x"));
        assert!(!store.set_search("x"));
        assert_eq!(store.revision(), 1);
    }
}
