//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its closed department set.
//! - Validate form input before it can become a stored contact.
//!
//! # Invariants
//! - `id` is non-empty and never reused for another contact.
//! - `name` is non-empty after trimming.
//! - `email` matches the core email grammar.
//! - `department` is always one of [`Department::ALL`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Stable identifier of a contact.
///
/// Generated contacts use UUID v4 strings; bundled seed data may carry any
/// non-empty string.
pub type ContactId = String;

/// Closed set of departments a contact can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Ventas")]
    Sales,
    #[serde(rename = "Desarrollo")]
    Development,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Soporte")]
    Support,
}

impl Department {
    /// Every department in display order.
    pub const ALL: [Department; 4] = [
        Department::Sales,
        Department::Development,
        Department::Marketing,
        Department::Support,
    ];

    /// Stable wire label used in persisted snapshots and seed data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "Ventas",
            Self::Development => "Desarrollo",
            Self::Marketing => "Marketing",
            Self::Support => "Soporte",
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ContactValidationError;

    /// Parses a wire label (`Ventas`) or English alias (`sales`), ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "ventas" | "sales" => Ok(Self::Sales),
            "desarrollo" | "development" => Ok(Self::Development),
            "marketing" => Ok(Self::Marketing),
            "soporte" | "support" => Ok(Self::Support),
            _ => Err(ContactValidationError::UnknownDepartment(
                value.trim().to_string(),
            )),
        }
    }
}

/// Validation failures for contact input and persisted contact records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyId,
    EmptyName,
    InvalidEmail(String),
    UnknownDepartment(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "contact id must not be empty"),
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::UnknownDepartment(value) => write!(
                f,
                "unknown department `{value}`; expected one of Ventas|Desarrollo|Marketing|Soporte"
            ),
        }
    }
}

impl Error for ContactValidationError {}

/// Input shape submitted by the form collaborator when adding a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    /// May be empty.
    #[serde(default)]
    pub phone: String,
    pub department: Department,
}

impl ContactFormData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        department: Department,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            department,
        }
    }

    /// Checks the form contract before a contact is built from it.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `InvalidEmail` when `email` does not match the email grammar.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Canonical stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactWire")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
}

impl Contact {
    /// Builds a contact from form data with a freshly generated id.
    pub fn from_form(form: ContactFormData) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), form)
    }

    /// Builds a contact from form data with a caller-provided id.
    ///
    /// Used by seed/import paths where identity already exists.
    pub fn with_id(id: impl Into<ContactId>, form: ContactFormData) -> Self {
        Self {
            id: id.into(),
            name: form.name,
            email: form.email,
            phone: form.phone,
            department: form.department,
        }
    }

    /// Validates record invariants.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.id.trim().is_empty() {
            return Err(ContactValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Returns whether `value` looks like an email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[derive(Deserialize)]
struct ContactWire {
    id: ContactId,
    name: String,
    email: String,
    #[serde(default)]
    phone: String,
    department: Department,
}

impl TryFrom<ContactWire> for Contact {
    type Error = ContactValidationError;

    fn try_from(wire: ContactWire) -> Result<Self, Self::Error> {
        let contact = Contact {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            phone: wire.phone,
            department: wire.department,
        };
        contact.validate()?;
        Ok(contact)
    }
}
