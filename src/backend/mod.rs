use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::models::{
    Application, ApplicationPayload, ApplicationStatus, Commission, Installation, NewSalesman,
    Package, Patch, Salesman,
};
use crate::utils::current_timestamp;

pub mod http;
pub mod memory;

pub use http::HttpDataAccess;
pub use memory::InMemoryStore;

/// Named resource collections exposed by the sales backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Packages,
    Salesmen,
    Applications,
    Commissions,
    Installations,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Packages,
        Collection::Salesmen,
        Collection::Applications,
        Collection::Commissions,
        Collection::Installations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Packages => "packages",
            Collection::Salesmen => "salesmen",
            Collection::Applications => "applications",
            Collection::Commissions => "commissions",
            Collection::Installations => "installations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown collection '{}'", s)))
    }
}

/// Equality filters in query-string form, e.g. `[("dealerId", "1")]`
pub type Filter = Vec<(String, String)>;

/// Untyped CRUD over the named collections
///
/// This is the seam between the application and whatever serves the data:
/// the HTTP client for a real deployment, the in-memory store for the mock
/// server and for tests.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List records whose fields equal every filter value
    async fn list(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>>;

    /// Fetch one record by numeric id
    async fn get(&self, collection: Collection, id: u32) -> AppResult<Value>;

    /// Insert a record; the store assigns its id
    async fn create(&self, collection: Collection, body: Value) -> AppResult<Value>;

    /// Shallow-merge `patch` into an existing record
    async fn patch(&self, collection: Collection, id: u32, patch: &Patch) -> AppResult<Value>;
}

/// Typed data-access operations used by the views and the intake wizard
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn get_packages(&self) -> AppResult<Vec<Package>>;
    async fn get_salesmen(&self, dealer_id: u32) -> AppResult<Vec<Salesman>>;
    async fn get_salesman(&self, id: u32) -> AppResult<Salesman>;
    async fn create_salesman(&self, salesman: &NewSalesman) -> AppResult<Salesman>;
    async fn update_salesman(&self, id: u32, patch: &Patch) -> AppResult<Salesman>;
    async fn deactivate_salesman(&self, id: u32) -> AppResult<Salesman>;
    async fn get_applications(
        &self,
        dealer_id: u32,
        agent_id: Option<u32>,
    ) -> AppResult<Vec<Application>>;
    async fn get_application(&self, id: u32) -> AppResult<Application>;
    async fn create_application(&self, payload: &ApplicationPayload) -> AppResult<Application>;
    async fn update_application(&self, id: u32, patch: &Patch) -> AppResult<Application>;
    async fn cancel_application(&self, id: u32) -> AppResult<Application>;
    async fn get_commissions(
        &self,
        dealer_id: u32,
        agent_id: Option<u32>,
    ) -> AppResult<Vec<Commission>>;
    async fn mark_commission_paid(&self, id: u32) -> AppResult<Commission>;
    async fn get_installations(&self, agent_id: u32) -> AppResult<Vec<Installation>>;
}

fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> AppResult<Vec<T>> {
    values.into_iter().map(decode).collect()
}

fn owner_filter(dealer_id: u32, agent_id: Option<u32>) -> Filter {
    let mut filter = vec![("dealerId".to_string(), dealer_id.to_string())];
    if let Some(agent_id) = agent_id {
        filter.push(("agentId".to_string(), agent_id.to_string()));
    }
    filter
}

fn single_field_patch(key: &str, value: Value) -> Patch {
    let mut patch = Patch::new();
    patch.insert(key.to_string(), value);
    patch
}

#[async_trait]
impl<S: ResourceStore> DataAccess for S {
    async fn get_packages(&self) -> AppResult<Vec<Package>> {
        decode_all(self.list(Collection::Packages, &Filter::new()).await?)
    }

    async fn get_salesmen(&self, dealer_id: u32) -> AppResult<Vec<Salesman>> {
        let filter = owner_filter(dealer_id, None);
        decode_all(self.list(Collection::Salesmen, &filter).await?)
    }

    async fn get_salesman(&self, id: u32) -> AppResult<Salesman> {
        decode(self.get(Collection::Salesmen, id).await?)
    }

    async fn create_salesman(&self, salesman: &NewSalesman) -> AppResult<Salesman> {
        let body = serde_json::to_value(salesman)?;
        decode(self.create(Collection::Salesmen, body).await?)
    }

    async fn update_salesman(&self, id: u32, patch: &Patch) -> AppResult<Salesman> {
        decode(self.patch(Collection::Salesmen, id, patch).await?)
    }

    async fn deactivate_salesman(&self, id: u32) -> AppResult<Salesman> {
        let patch = single_field_patch("isActive", json!(false));
        self.update_salesman(id, &patch).await
    }

    async fn get_applications(
        &self,
        dealer_id: u32,
        agent_id: Option<u32>,
    ) -> AppResult<Vec<Application>> {
        let filter = owner_filter(dealer_id, agent_id);
        decode_all(self.list(Collection::Applications, &filter).await?)
    }

    async fn get_application(&self, id: u32) -> AppResult<Application> {
        decode(self.get(Collection::Applications, id).await?)
    }

    async fn create_application(&self, payload: &ApplicationPayload) -> AppResult<Application> {
        let body = serde_json::to_value(payload)?;
        decode(self.create(Collection::Applications, body).await?)
    }

    async fn update_application(&self, id: u32, patch: &Patch) -> AppResult<Application> {
        decode(self.patch(Collection::Applications, id, patch).await?)
    }

    async fn cancel_application(&self, id: u32) -> AppResult<Application> {
        let patch = single_field_patch("status", json!(ApplicationStatus::Cancelled));
        self.update_application(id, &patch).await
    }

    async fn get_commissions(
        &self,
        dealer_id: u32,
        agent_id: Option<u32>,
    ) -> AppResult<Vec<Commission>> {
        let filter = owner_filter(dealer_id, agent_id);
        decode_all(self.list(Collection::Commissions, &filter).await?)
    }

    async fn mark_commission_paid(&self, id: u32) -> AppResult<Commission> {
        let mut patch = single_field_patch("paid", json!(true));
        patch.insert("paidAt".to_string(), json!(current_timestamp()));
        decode(self.patch(Collection::Commissions, id, &patch).await?)
    }

    async fn get_installations(&self, agent_id: u32) -> AppResult<Vec<Installation>> {
        let filter = vec![("agentId".to_string(), agent_id.to_string())];
        decode_all(self.list(Collection::Installations, &filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trips_through_path_segment() {
        for collection in Collection::ALL {
            assert_eq!(collection.as_str().parse::<Collection>().unwrap(), collection);
        }
        assert!(matches!(
            "users".parse::<Collection>(),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_owner_filter_includes_agent_only_when_scoped() {
        assert_eq!(
            owner_filter(1, None),
            vec![("dealerId".to_string(), "1".to_string())]
        );
        assert_eq!(owner_filter(1, Some(2)).len(), 2);
    }
}
