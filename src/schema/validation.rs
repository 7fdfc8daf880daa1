use lazy_static::lazy_static;
use regex::Regex;

use crate::models::IdType;

lazy_static! {
    // Shape check only, not RFC 5322
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+254[0-9]{9}$").unwrap();
    static ref NATIONAL_ID_RE: Regex = Regex::new(r"^[0-9]{8}$").unwrap();
    static ref PASSPORT_RE: Regex = Regex::new(r"^[A-Za-z0-9]{6,9}$").unwrap();
}

/// Validates the minimal `local@domain.tld` email shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates a canonical Kenyan mobile number; call `normalize_phone` first
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Kenyan national ID numbers are exactly 8 digits
pub fn is_valid_national_id(id: &str) -> bool {
    NATIONAL_ID_RE.is_match(id)
}

/// Passport numbers are 6 to 9 ASCII letters or digits
pub fn is_valid_passport(passport: &str) -> bool {
    PASSPORT_RE.is_match(passport)
}

/// Returns true when `value` is non-empty after trimming
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

impl IdType {
    /// Validate an identity number against the rule for this document type
    pub fn validate(&self, id_value: &str) -> bool {
        match self {
            IdType::NationalId => is_valid_national_id(id_value),
            IdType::Passport => is_valid_passport(id_value),
        }
    }

    /// Message shown next to the id field when `validate` fails
    pub fn error_message(&self) -> &'static str {
        match self {
            IdType::NationalId => "National ID must be exactly 8 digits",
            IdType::Passport => "Passport number must be 6-9 letters or digits",
        }
    }
}
