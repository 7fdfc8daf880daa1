use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Internet package offered to customers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: u32,
    pub name: String,
    pub speed: String,
    /// Monthly price in KSh
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub color: String,
}

/// Agent record as listed in the salesmen directory
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Salesman {
    pub id: u32,
    pub dealer_id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Human-facing agent code such as `AG001`
    pub agent_id: String,
    pub is_active: bool,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub total_commission: u64,
    #[serde(default)]
    pub created_at: String,
}

/// Fields accepted when registering a new salesman
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSalesman {
    pub dealer_id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub agent_id: String,
    pub is_active: bool,
    pub total_sales: u64,
    pub total_commission: u64,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAddress {
    pub building: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub area: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Dispatched,
    Active,
    Cancelled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Dispatched => "dispatched",
            ApplicationStatus::Active => "active",
            ApplicationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "dispatched" => Ok(ApplicationStatus::Dispatched),
            "active" => Ok(ApplicationStatus::Active),
            "cancelled" => Ok(ApplicationStatus::Cancelled),
            other => Err(AppError::BadRequest(format!(
                "Unknown application status: {}",
                other
            ))),
        }
    }
}

/// Customer identity document kind
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum IdType {
    #[default]
    NationalId,
    Passport,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::NationalId => "nationalId",
            IdType::Passport => "passport",
        }
    }
}

impl FromStr for IdType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "nationalid" | "id" => Ok(IdType::NationalId),
            "passport" => Ok(IdType::Passport),
            other => Err(AppError::BadRequest(format!("Unknown id type: {}", other))),
        }
    }
}

/// Presence marker for a KYC attachment; file contents are never inspected
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploaded,
    #[default]
    Pending,
}

impl DocumentStatus {
    pub fn from_presence(present: bool) -> Self {
        if present {
            DocumentStatus::Uploaded
        } else {
            DocumentStatus::Pending
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KycDocuments {
    pub national_id: DocumentStatus,
    pub proof_of_address: DocumentStatus,
}

/// Payload handed to the data-access layer when an intake is submitted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub dealer_id: u32,
    pub agent_id: Option<u32>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_id_type: IdType,
    pub customer_id_number: String,
    pub physical_address: PhysicalAddress,
    pub package_id: u32,
    pub package_name: String,
    pub status: ApplicationStatus,
    pub submitted_at: String,
    pub kyc_documents: KycDocuments,
}

/// Customer application as stored by the backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u32,
    #[serde(default)]
    pub application_number: String,
    pub dealer_id: u32,
    #[serde(default)]
    pub agent_id: Option<u32>,
    #[serde(default)]
    pub agent_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_id_type: IdType,
    #[serde(alias = "customerNationalId")]
    pub customer_id_number: String,
    pub physical_address: PhysicalAddress,
    pub package_id: u32,
    #[serde(default)]
    pub package_name: String,
    pub status: ApplicationStatus,
    pub submitted_at: String,
    #[serde(default)]
    pub dispatched_at: Option<String>,
    #[serde(default)]
    pub installed_at: Option<String>,
    #[serde(default)]
    pub kyc_documents: KycDocuments,
}

/// Monthly commission statement for one agent
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: u32,
    pub dealer_id: u32,
    pub agent_id: u32,
    pub agent_name: String,
    /// `YYYY-MM`
    pub period: String,
    pub total_sales: u64,
    pub successful_activations: u64,
    pub total_revenue: u64,
    /// Fraction, e.g. `0.1` for 10%
    pub commission_rate: f64,
    pub total_commission: u64,
    pub paid: bool,
    #[serde(default)]
    pub paid_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InstallationStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InstallationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationStatus::Scheduled => "scheduled",
            InstallationStatus::InProgress => "in-progress",
            InstallationStatus::Completed => "completed",
            InstallationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(InstallationStatus::Scheduled),
            "in-progress" | "in_progress" | "inprogress" => Ok(InstallationStatus::InProgress),
            "completed" => Ok(InstallationStatus::Completed),
            "cancelled" => Ok(InstallationStatus::Cancelled),
            other => Err(AppError::BadRequest(format!(
                "Unknown installation status: {}",
                other
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: u32,
    pub application_id: u32,
    pub application_number: String,
    pub agent_id: u32,
    pub agent_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub package_name: String,
    pub status: InstallationStatus,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub technician_assigned: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Partial update sent as a PATCH body; keys use the backend's camelCase names
pub type Patch = serde_json::Map<String, Value>;
