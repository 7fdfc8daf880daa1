//! Searchable listings: sales records, salesmen directory, installations

use std::str::FromStr;

use crate::error::AppError;
use crate::models::{Application, ApplicationStatus, Installation, InstallationStatus, Salesman};

/// `all` or one specific status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn accepts(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl<S: FromStr<Err = AppError>> FromStr for StatusFilter<S> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Only(s.parse()?))
        }
    }
}

/// Sales records matching a free-text search and a status filter
///
/// Customer name, application number and agent name match
/// case-insensitively; the phone number matches as a plain substring.
pub fn search_applications<'a>(
    applications: &'a [Application],
    search: &str,
    status: StatusFilter<ApplicationStatus>,
) -> Vec<&'a Application> {
    let needle = search.to_lowercase();
    applications
        .iter()
        .filter(|app| {
            app.customer_name.to_lowercase().contains(&needle)
                || app.application_number.to_lowercase().contains(&needle)
                || app.customer_phone.contains(search)
                || app.agent_name.to_lowercase().contains(&needle)
        })
        .filter(|app| status.accepts(&app.status))
        .collect()
}

pub fn count_applications(applications: &[Application], status: ApplicationStatus) -> usize {
    applications.iter().filter(|app| app.status == status).count()
}

pub fn search_salesmen<'a>(salesmen: &'a [Salesman], search: &str) -> Vec<&'a Salesman> {
    let needle = search.to_lowercase();
    salesmen
        .iter()
        .filter(|salesman| {
            salesman.name.to_lowercase().contains(&needle)
                || salesman.email.to_lowercase().contains(&needle)
                || salesman.agent_id.to_lowercase().contains(&needle)
                || salesman.phone.contains(search)
        })
        .collect()
}

pub fn filter_installations(
    installations: &[Installation],
    status: StatusFilter<InstallationStatus>,
) -> Vec<&Installation> {
    installations
        .iter()
        .filter(|installation| status.accepts(&installation.status))
        .collect()
}

pub fn count_installations(installations: &[Installation], status: InstallationStatus) -> usize {
    installations
        .iter()
        .filter(|installation| installation.status == status)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdType, KycDocuments, PhysicalAddress};

    fn application(
        id: u32,
        customer: &str,
        agent: &str,
        phone: &str,
        status: ApplicationStatus,
    ) -> Application {
        Application {
            id,
            application_number: format!("APP-2024-{:03}", id),
            dealer_id: 1,
            agent_id: Some(1),
            agent_name: agent.to_string(),
            customer_name: customer.to_string(),
            customer_email: "customer@example.com".to_string(),
            customer_phone: phone.to_string(),
            customer_id_type: IdType::NationalId,
            customer_id_number: "12345678".to_string(),
            physical_address: PhysicalAddress::default(),
            package_id: 1,
            package_name: "Bronze".to_string(),
            status,
            submitted_at: "2024-03-01T10:00:00.000Z".to_string(),
            dispatched_at: None,
            installed_at: None,
            kyc_documents: KycDocuments::default(),
        }
    }

    fn sample() -> Vec<Application> {
        vec![
            application(
                1,
                "Mary Wanjiku",
                "Peter Kamau",
                "+254722000111",
                ApplicationStatus::Active,
            ),
            application(
                2,
                "John Otieno",
                "Grace Achieng",
                "+254733000222",
                ApplicationStatus::Pending,
            ),
            application(
                3,
                "Faith Mutua",
                "Peter Kamau",
                "+254711000333",
                ApplicationStatus::Cancelled,
            ),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_on_names() {
        let apps = sample();
        let hits = search_applications(&apps, "peter", StatusFilter::All);
        assert_eq!(hits.len(), 2);
        let hits = search_applications(&apps, "app-2024-002", StatusFilter::All);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_search_matches_phone_substring() {
        let apps = sample();
        let hits = search_applications(&apps, "0333", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_name, "Faith Mutua");
    }

    #[test]
    fn test_status_filter() {
        let apps = sample();
        let filter: StatusFilter<ApplicationStatus> = "active".parse().unwrap();
        let hits = search_applications(&apps, "", filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(count_applications(&apps, ApplicationStatus::Pending), 1);

        let all: StatusFilter<ApplicationStatus> = "ALL".parse().unwrap();
        assert_eq!(all, StatusFilter::All);
        assert!("shipped".parse::<StatusFilter<ApplicationStatus>>().is_err());
    }

    #[test]
    fn test_search_salesmen() {
        let salesmen = vec![Salesman {
            id: 1,
            dealer_id: 1,
            name: "Peter Kamau".to_string(),
            email: "peter@homefaiba.co.ke".to_string(),
            phone: "+254722111222".to_string(),
            agent_id: "AG001".to_string(),
            is_active: true,
            total_sales: 12,
            total_commission: 3600,
            created_at: String::new(),
        }];
        assert_eq!(search_salesmen(&salesmen, "ag001").len(), 1);
        assert_eq!(search_salesmen(&salesmen, "HOMEFAIBA").len(), 1);
        assert_eq!(search_salesmen(&salesmen, "111222").len(), 1);
        assert!(search_salesmen(&salesmen, "grace").is_empty());
    }
}
