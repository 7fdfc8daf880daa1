#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use homefaiba_sales::auth::Session;
use homefaiba_sales::backend::{Collection, Filter, InMemoryStore, ResourceStore};
use homefaiba_sales::config::IntakeConfig;
use homefaiba_sales::error::{AppError, AppResult};
use homefaiba_sales::models::Patch;
use homefaiba_sales::resource;
use homefaiba_sales::wizard::{Field, IntakeWizard, Step, StepOutcome};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const SEED: &str = include_str!("../../data/db.json");

/// Store loaded with the bundled demo data
pub fn seeded_store() -> InMemoryStore {
    InMemoryStore::from_json_str(SEED).unwrap()
}

/// Mock REST API over the bundled demo data
pub fn setup_test_app() -> Router {
    resource::router(Arc::new(seeded_store()))
}

/// Store wrapper that counts create calls and can be told to fail them
pub struct RecordingStore {
    pub inner: InMemoryStore,
    pub creates: AtomicUsize,
    pub fail_creates: AtomicBool,
    pub fail_lists: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: seeded_store(),
            creates: AtomicUsize::new(0),
            fail_creates: AtomicBool::new(false),
            fail_lists: AtomicBool::new(false),
        }
    }

    pub fn failing_creates() -> Self {
        let store = Self::new();
        store.fail_creates.store(true, Ordering::SeqCst);
        store
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceStore for RecordingStore {
    async fn list(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Backend("connection refused".to_string()));
        }
        self.inner.list(collection, filter).await
    }

    async fn get(&self, collection: Collection, id: u32) -> AppResult<Value> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: Collection, body: Value) -> AppResult<Value> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Backend("POST /applications returned 500".to_string()));
        }
        self.inner.create(collection, body).await
    }

    async fn patch(&self, collection: Collection, id: u32, patch: &Patch) -> AppResult<Value> {
        self.inner.patch(collection, id, patch).await
    }
}

pub fn agent_session() -> Session {
    Session::agent(1, 1)
}

/// Walk a fresh wizard through steps 1-3 with valid answers
pub fn wizard_on_review_step(session: Session) -> IntakeWizard {
    let mut wizard = IntakeWizard::new(session, &IntakeConfig::default());
    let answers = [
        (Field::PackageId, "2"),
        (Field::FullName, "Jane Wambui"),
        (Field::Email, "jane.wambui@example.com"),
        (Field::Phone, "0712 345 678"),
        (Field::IdValue, "12345678"),
        (Field::Building, "Kilimani Heights"),
        (Field::Area, "Kilimani"),
    ];
    for (field, value) in answers {
        wizard.field_changed(field, value).unwrap();
    }
    for _ in 0..3 {
        assert!(matches!(wizard.next(), StepOutcome::Advanced(_)));
    }
    assert_eq!(wizard.current_step(), Step::DocumentsAndReview);
    wizard
}
