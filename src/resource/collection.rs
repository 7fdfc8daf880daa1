use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::AppState;
use crate::backend::{Collection, Filter, ResourceStore};
use crate::error::AppResult;
use crate::models::Patch;

/// `GET /{collection}` with equality filters taken from the query string
///
/// Parameters starting with `_` are reserved for paging and sorting in the
/// upstream mock server and are ignored here.
pub async fn list_records(
    State(store): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Value>>> {
    let collection: Collection = collection.parse()?;
    let filter: Filter = params
        .into_iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .collect();
    Ok(Json(store.list(collection, &filter).await?))
}

/// `GET /{collection}/{id}`
pub async fn get_record(
    State(store): State<AppState>,
    Path((collection, id)): Path<(String, u32)>,
) -> AppResult<Json<Value>> {
    let collection: Collection = collection.parse()?;
    Ok(Json(store.get(collection, id).await?))
}

/// `POST /{collection}`
pub async fn create_record(
    State(store): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let collection: Collection = collection.parse()?;
    let created = store.create(collection, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /{collection}/{id}`
pub async fn patch_record(
    State(store): State<AppState>,
    Path((collection, id)): Path<(String, u32)>,
    Json(patch): Json<Patch>,
) -> AppResult<Json<Value>> {
    let collection: Collection = collection.parse()?;
    Ok(Json(store.patch(collection, id, &patch).await?))
}
