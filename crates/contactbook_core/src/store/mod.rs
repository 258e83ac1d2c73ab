//! Reactive state store.
//!
//! # Responsibility
//! - Hold raw state (collection, filter criteria, loading flag).
//! - Derive filtered views synchronously from raw state.
//! - Expose the mutation API through [`app_state::AppState`].
//!
//! # Invariants
//! - All state is owned by one `AppState`; there are no global singletons.
//! - Writes replace whole values; observers never see partial updates.

use crate::model::contact::ContactValidationError;
use crate::persist::PersistError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod app_state;
pub mod derive;
pub mod entity_store;
pub mod filter_store;
pub mod loading;

pub type StoreResult<T> = Result<T, StoreError>;

/// Container-level error.
#[derive(Debug)]
pub enum StoreError {
    /// Form data violated the contact contract; nothing was stored.
    Validation(ContactValidationError),
    /// Storage could not be opened or the writer is gone.
    Persist(PersistError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for StoreError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistError> for StoreError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}
