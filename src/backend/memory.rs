use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{Collection, Filter, ResourceStore};
use crate::error::{AppError, AppResult};
use crate::models::Patch;

/// In-memory collection store with mock-JSON-server semantics
///
/// Records are kept as raw JSON objects keyed by collection. Ids are
/// assigned as `max(id) + 1` on insert.
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let collections = Collection::ALL
            .into_iter()
            .map(|collection| (collection, Vec::new()))
            .collect();
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Build a store from a `db.json`-shaped document:
    /// `{ "packages": [...], "salesmen": [...], ... }`
    ///
    /// Missing collections start empty; unknown top-level keys are rejected.
    pub fn from_seed(seed: Value) -> AppResult<Self> {
        let Value::Object(document) = seed else {
            return Err(AppError::Configuration(
                "Seed document must be a JSON object".to_string(),
            ));
        };

        let mut collections: HashMap<Collection, Vec<Value>> = Collection::ALL
            .into_iter()
            .map(|collection| (collection, Vec::new()))
            .collect();

        for (key, records) in document {
            let collection: Collection = key.parse().map_err(|_| {
                AppError::Configuration(format!("Unknown seed collection '{}'", key))
            })?;
            let Value::Array(records) = records else {
                return Err(AppError::Configuration(format!(
                    "Seed collection '{}' must be an array",
                    key
                )));
            };
            for record in &records {
                if record_id(record).is_none() {
                    return Err(AppError::Configuration(format!(
                        "Every record in '{}' needs a numeric id",
                        key
                    )));
                }
            }
            debug!("Seeded {} with {} records", collection, records.len());
            collections.insert(collection, records);
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    pub fn from_json_str(content: &str) -> AppResult<Self> {
        Self::from_seed(serde_json::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read seed file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let store = Self::from_json_str(&content)?;
        info!("Loaded seed data from {}", path.as_ref().display());
        Ok(store)
    }

    /// Number of records currently held in `collection`
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn record_id(record: &Value) -> Option<u32> {
    record
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
}

/// Render a field the way it would appear in a query string
fn query_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_filter(record: &Value, filter: &Filter) -> bool {
    filter.iter().all(|(key, expected)| {
        record
            .get(key)
            .map(|actual| query_form(actual) == *expected)
            .unwrap_or(false)
    })
}

fn not_found(collection: Collection, id: u32) -> AppError {
    AppError::NotFound(format!("{}/{}", collection, id))
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn list(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let records = collections.get(&collection).map(Vec::as_slice).unwrap_or(&[]);
        Ok(records
            .iter()
            .filter(|record| matches_filter(record, filter))
            .cloned()
            .collect())
    }

    async fn get(&self, collection: Collection, id: u32) -> AppResult<Value> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .and_then(|records| records.iter().find(|record| record_id(record) == Some(id)))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: Collection, body: Value) -> AppResult<Value> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();
        let id = records
            .iter()
            .filter_map(record_id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                AppError::BadRequest(format!("No ids left to assign in {}", collection))
            })?;
        fields.insert("id".to_string(), Value::from(id));

        if collection == Collection::Applications {
            assign_application_number(&mut fields, id);
        }

        let record = Value::Object(fields);
        records.push(record.clone());
        info!("Created {}/{}", collection, id);
        Ok(record)
    }

    async fn patch(&self, collection: Collection, id: u32, patch: &Patch) -> AppResult<Value> {
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(&collection)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|record| record_id(record) == Some(id))
            })
            .ok_or_else(|| not_found(collection, id))?;

        if let Value::Object(fields) = &mut *record {
            for (key, value) in patch {
                // ids are immutable
                if key != "id" {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        debug!("Patched {}/{} ({} fields)", collection, id, patch.len());
        Ok(record.clone())
    }
}

fn assign_application_number(fields: &mut Map<String, Value>, id: u32) {
    let missing = fields
        .get("applicationNumber")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty);
    if missing {
        let number = format!("APP-{}-{:03}", Utc::now().format("%Y"), id);
        fields.insert("applicationNumber".to_string(), Value::String(number));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryStore {
        InMemoryStore::from_seed(json!({
            "salesmen": [
                { "id": 1, "dealerId": 1, "name": "Peter", "isActive": true },
                { "id": 2, "dealerId": 1, "name": "Grace", "isActive": true },
                { "id": 5, "dealerId": 2, "name": "Otieno", "isActive": false }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_applies_equality_filters() {
        let store = seeded();
        let filter = vec![("dealerId".to_string(), "1".to_string())];
        let records = store.list(Collection::Salesmen, &filter).await.unwrap();
        assert_eq!(records.len(), 2);

        let filter = vec![("isActive".to_string(), "false".to_string())];
        let records = store.list(Collection::Salesmen, &filter).await.unwrap();
        assert_eq!(records[0]["name"], "Otieno");

        let all = store.list(Collection::Packages, &Filter::new()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = seeded();
        let created = store
            .create(Collection::Salesmen, json!({ "dealerId": 1, "name": "Wanjiru" }))
            .await
            .unwrap();
        assert_eq!(created["id"], 6);
        assert_eq!(store.len(Collection::Salesmen).await, 4);
    }

    #[tokio::test]
    async fn test_create_fails_when_ids_are_exhausted() {
        let store = InMemoryStore::from_seed(json!({
            "salesmen": [{ "id": u32::MAX, "dealerId": 1, "name": "Last" }]
        }))
        .unwrap();

        let result = store
            .create(Collection::Salesmen, json!({ "dealerId": 1, "name": "Overflow" }))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.len(Collection::Salesmen).await, 1);
    }

    #[tokio::test]
    async fn test_create_application_gets_number() {
        let store = InMemoryStore::new();
        let created = store
            .create(Collection::Applications, json!({ "dealerId": 1 }))
            .await
            .unwrap();
        let number = created["applicationNumber"].as_str().unwrap();
        assert!(number.starts_with("APP-"));
        assert!(number.ends_with("-001"));
    }

    #[tokio::test]
    async fn test_create_rejects_non_object() {
        let store = InMemoryStore::new();
        let result = store.create(Collection::Packages, json!([1, 2])).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_patch_merges_and_keeps_id() {
        let store = seeded();
        let mut patch = Patch::new();
        patch.insert("isActive".to_string(), json!(false));
        patch.insert("id".to_string(), json!(99));

        let patched = store.patch(Collection::Salesmen, 2, &patch).await.unwrap();
        assert_eq!(patched["id"], 2);
        assert_eq!(patched["isActive"], false);
        assert_eq!(patched["name"], "Grace");

        let missing = store.patch(Collection::Salesmen, 42, &patch).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_seed_rejects_unknown_collection() {
        let result = InMemoryStore::from_seed(json!({ "users": [] }));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_seed_requires_ids() {
        let result = InMemoryStore::from_seed(json!({ "packages": [{ "name": "Gold" }] }));
        assert!(result.is_err());
    }
}
