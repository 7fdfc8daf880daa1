pub mod normalization;
pub mod validation;

pub use normalization::normalize_phone;
pub use validation::{
    is_present, is_valid_email, is_valid_national_id, is_valid_passport, is_valid_phone,
};
