//! Domain model for contact records and filter criteria.
//!
//! # Responsibility
//! - Define canonical data structures used by the state store.
//! - Keep validation rules next to the types they protect.
//!
//! # Invariants
//! - Every stored contact is identified by a non-empty `ContactId`.
//! - Departments come from a closed set; there is no "unknown" variant.

pub mod contact;
pub mod filter;
