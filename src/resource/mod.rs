//! Mock REST API over the in-memory store
//!
//! Serves the same routes the sales front end calls on its JSON mock
//! backend, so the HTTP data-access client can run against it locally.

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::InMemoryStore;
use crate::logging::logging_middleware;

pub mod collection;

pub type AppState = Arc<InMemoryStore>;

pub fn router(store: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/{collection}",
            get(collection::list_records).post(collection::create_record),
        )
        .route(
            "/{collection}/{id}",
            get(collection::get_record).patch(collection::patch_record),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(store)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
