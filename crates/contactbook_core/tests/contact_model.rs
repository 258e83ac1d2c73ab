use contactbook_core::{Contact, ContactFormData, ContactValidationError, Department};

#[test]
fn contact_serialization_uses_flat_wire_fields() {
    let contact = Contact::with_id(
        "1",
        ContactFormData::new("Ana Lopez", "ana@x.com", "+34 600", Department::Development),
    );

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "1",
            "name": "Ana Lopez",
            "email": "ana@x.com",
            "phone": "+34 600",
            "department": "Desarrollo"
        })
    );

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn deserialize_rejects_contacts_breaking_invariants() {
    let invalid_email = serde_json::json!({
        "id": "1",
        "name": "Ana",
        "email": "ana-at-x.com",
        "phone": "",
        "department": "Ventas"
    });
    let err = serde_json::from_value::<Contact>(invalid_email).unwrap_err();
    assert!(
        err.to_string().contains("invalid email address"),
        "unexpected error: {err}"
    );

    let unknown_department = serde_json::json!({
        "id": "1",
        "name": "Ana",
        "email": "ana@x.com",
        "phone": "",
        "department": "Legal"
    });
    assert!(serde_json::from_value::<Contact>(unknown_department).is_err());

    let missing_department = serde_json::json!({
        "id": "1",
        "name": "Ana",
        "email": "ana@x.com",
        "phone": ""
    });
    assert!(serde_json::from_value::<Contact>(missing_department).is_err());
}

#[test]
fn from_form_generates_distinct_ids() {
    let form = ContactFormData::new("Bo", "bo@x.com", "", Department::Support);
    let first = Contact::from_form(form.clone());
    let second = Contact::from_form(form);

    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert!(first.validate().is_ok());
}

#[test]
fn form_validation_allows_empty_phone_only() {
    assert!(ContactFormData::new("Bo", "bo@x.com", "", Department::Support)
        .validate()
        .is_ok());
    assert_eq!(
        ContactFormData::new("", "bo@x.com", "", Department::Support).validate(),
        Err(ContactValidationError::EmptyName)
    );
    assert_eq!(
        ContactFormData::new("Bo", "", "", Department::Support).validate(),
        Err(ContactValidationError::InvalidEmail(String::new()))
    );
}

#[test]
fn departments_expose_stable_labels() {
    let labels: Vec<&str> = Department::ALL.iter().map(|d| d.as_str()).collect();
    assert_eq!(labels, vec!["Ventas", "Desarrollo", "Marketing", "Soporte"]);
    assert_eq!(Department::Support.to_string(), "Soporte");
}
