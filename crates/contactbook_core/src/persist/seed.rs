//! Bundled seed dataset used when no durable state exists.

use crate::model::contact::Contact;
use crate::persist::snapshot::decode_snapshot;
use log::error;

const BUNDLED_SEED_JSON: &str = include_str!("../../data/seed_contacts.json");

/// Returns the bundled seed contacts in file order.
///
/// A broken bundle degrades to an empty collection instead of failing startup.
pub fn bundled_seed() -> Vec<Contact> {
    match decode_snapshot(BUNDLED_SEED_JSON) {
        Ok(decoded) => decoded.contacts,
        Err(err) => {
            error!(
                "event=seed_load module=persist status=error error_code=seed_invalid error={}",
                err
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::bundled_seed;
    use crate::model::contact::Department;

    #[test]
    fn bundled_seed_is_valid_and_covers_every_department() {
        let seed = bundled_seed();
        assert!(!seed.is_empty());
        for department in Department::ALL {
            assert!(
                seed.iter().any(|contact| contact.department == department),
                "seed has no {department} contact"
            );
        }
    }
}
