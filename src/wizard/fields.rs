use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::models::{IdType, PhysicalAddress};

/// Every input the intake flow collects, addressed by its form name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PackageId,
    FullName,
    Email,
    Phone,
    IdType,
    IdValue,
    Building,
    Floor,
    Unit,
    Street,
    Area,
    City,
    PostalCode,
    NationalIdDocument,
    ProofOfAddressDocument,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::PackageId,
        Field::FullName,
        Field::Email,
        Field::Phone,
        Field::IdType,
        Field::IdValue,
        Field::Building,
        Field::Floor,
        Field::Unit,
        Field::Street,
        Field::Area,
        Field::City,
        Field::PostalCode,
        Field::NationalIdDocument,
        Field::ProofOfAddressDocument,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PackageId => "packageId",
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::IdType => "idType",
            Field::IdValue => "idValue",
            Field::Building => "building",
            Field::Floor => "floor",
            Field::Unit => "unit",
            Field::Street => "street",
            Field::Area => "area",
            Field::City => "city",
            Field::PostalCode => "postalCode",
            Field::NationalIdDocument => "nationalIdDocument",
            Field::ProofOfAddressDocument => "proofOfAddressDocument",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the form's `address.building` style names as well
        let name = s.strip_prefix("address.").unwrap_or(s);
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown intake field '{}'", s)))
    }
}

/// Raw wizard inputs
///
/// Values are kept exactly as typed until a step gate passes; the only
/// in-place rewrite is the phone number becoming canonical on step 2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeFields {
    /// Zero means "nothing selected"
    pub package_id: u32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub id_type: IdType,
    pub id_value: String,
    pub address: PhysicalAddress,
    /// Attachment file names; only presence is ever inspected
    pub national_id_document: Option<String>,
    pub proof_of_address_document: Option<String>,
}

impl IntakeFields {
    pub fn with_default_city(city: &str) -> Self {
        Self {
            address: PhysicalAddress {
                city: city.to_string(),
                ..PhysicalAddress::default()
            },
            ..Self::default()
        }
    }

    /// Current value of `field` as text
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::PackageId => self.package_id.to_string(),
            Field::FullName => self.full_name.clone(),
            Field::Email => self.email.clone(),
            Field::Phone => self.phone.clone(),
            Field::IdType => self.id_type.as_str().to_string(),
            Field::IdValue => self.id_value.clone(),
            Field::Building => self.address.building.clone(),
            Field::Floor => self.address.floor.clone(),
            Field::Unit => self.address.unit.clone(),
            Field::Street => self.address.street.clone(),
            Field::Area => self.address.area.clone(),
            Field::City => self.address.city.clone(),
            Field::PostalCode => self.address.postal_code.clone(),
            Field::NationalIdDocument => self.national_id_document.clone().unwrap_or_default(),
            Field::ProofOfAddressDocument => {
                self.proof_of_address_document.clone().unwrap_or_default()
            }
        }
    }

    /// Store `value` into `field`
    ///
    /// Package ids must parse as unsigned integers (blank clears the
    /// selection) and id types must name a known document kind. Changing
    /// the id type clears the entered id value. Returns whether any stored
    /// value changed.
    pub fn set(&mut self, field: Field, value: &str) -> AppResult<bool> {
        let before = self.clone();
        match field {
            Field::PackageId => {
                let trimmed = value.trim();
                self.package_id = if trimmed.is_empty() {
                    0
                } else {
                    trimmed.parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid package id '{}'", value))
                    })?
                };
            }
            Field::FullName => self.full_name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::IdType => {
                let id_type: IdType = value.parse()?;
                if id_type != self.id_type {
                    self.id_type = id_type;
                    self.id_value.clear();
                }
            }
            Field::IdValue => self.id_value = value.to_string(),
            Field::Building => self.address.building = value.to_string(),
            Field::Floor => self.address.floor = value.to_string(),
            Field::Unit => self.address.unit = value.to_string(),
            Field::Street => self.address.street = value.to_string(),
            Field::Area => self.address.area = value.to_string(),
            Field::City => self.address.city = value.to_string(),
            Field::PostalCode => self.address.postal_code = value.to_string(),
            Field::NationalIdDocument => self.national_id_document = attachment(value),
            Field::ProofOfAddressDocument => self.proof_of_address_document = attachment(value),
        }
        Ok(*self != before)
    }
}

fn attachment(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert_eq!("address.city".parse::<Field>().unwrap(), Field::City);
        assert!("customerNationalId".parse::<Field>().is_err());
    }

    #[test]
    fn test_switching_id_type_clears_id_value() {
        let mut fields = IntakeFields::default();
        fields.set(Field::IdValue, "12345678").unwrap();
        fields.set(Field::IdType, "passport").unwrap();
        assert_eq!(fields.id_type, IdType::Passport);
        assert_eq!(fields.id_value, "");
    }

    #[test]
    fn test_reselecting_same_id_type_keeps_value() {
        let mut fields = IntakeFields::default();
        fields.set(Field::IdValue, "12345678").unwrap();
        let changed = fields.set(Field::IdType, "nationalId").unwrap();
        assert!(!changed);
        assert_eq!(fields.id_value, "12345678");
    }

    #[test]
    fn test_package_id_parsing() {
        let mut fields = IntakeFields::default();
        fields.set(Field::PackageId, "3").unwrap();
        assert_eq!(fields.package_id, 3);
        fields.set(Field::PackageId, "").unwrap();
        assert_eq!(fields.package_id, 0);
        assert!(fields.set(Field::PackageId, "gold").is_err());
        assert_eq!(fields.package_id, 0);
    }

    #[test]
    fn test_documents_record_presence_only() {
        let mut fields = IntakeFields::default();
        fields.set(Field::NationalIdDocument, "id-front.jpg").unwrap();
        assert_eq!(fields.get(Field::NationalIdDocument), "id-front.jpg");
        fields.set(Field::NationalIdDocument, "  ").unwrap();
        assert!(fields.national_id_document.is_none());
    }

    #[test]
    fn test_default_city() {
        let fields = IntakeFields::with_default_city("Nairobi");
        assert_eq!(fields.get(Field::City), "Nairobi");
        assert_eq!(fields.get(Field::Building), "");
    }
}
