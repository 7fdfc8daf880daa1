//! Per-step validation gates
//!
//! A gate never fails loudly: it reports one message per offending field
//! and leaves the inputs untouched.

use super::fields::{Field, IntakeFields};
use crate::error::FieldErrors;
use crate::schema::{is_present, is_valid_email, is_valid_phone, normalize_phone};

/// Step 1: some package id has been chosen. Existence among the fetched
/// packages is deliberately not checked.
pub fn package_gate(fields: &IntakeFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if fields.package_id == 0 {
        errors.insert(Field::PackageId, "Please select a package".to_string());
    }
    errors
}

/// Step 2: contact details. On success returns the canonical phone number
/// the caller should store in place of the raw input.
pub fn contact_gate(fields: &IntakeFields) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    if !is_present(&fields.full_name) {
        errors.insert(Field::FullName, "Full name is required".to_string());
    }

    if !is_valid_email(&fields.email) {
        errors.insert(Field::Email, "Enter a valid email address".to_string());
    }

    let phone = normalize_phone(&fields.phone);
    if !is_valid_phone(&phone) {
        errors.insert(
            Field::Phone,
            "Enter a valid Kenyan phone number (+254XXXXXXXXX)".to_string(),
        );
    }

    if !fields.id_type.validate(&fields.id_value) {
        errors.insert(Field::IdValue, fields.id_type.error_message().to_string());
    }

    if errors.is_empty() {
        Ok(phone)
    } else {
        Err(errors)
    }
}

/// Step 3: building and city are mandatory; the other address lines pass
/// through unvalidated.
pub fn address_gate(fields: &IntakeFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_present(&fields.address.building) {
        errors.insert(Field::Building, "Building is required".to_string());
    }
    if !is_present(&fields.address.city) {
        errors.insert(Field::City, "City is required".to_string());
    }
    errors
}
