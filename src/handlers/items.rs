use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemId},
    AppState,
};

/// The request body, accumulated in full, parsed as one JSON object.
fn parse_body(body: &Bytes) -> AppResult<IndexMap<String, Value>> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("invalid JSON object body: {err}")))
}

/// Malformed ids behave as a missing item, not as a format error.
fn parse_id(raw: &str) -> AppResult<ItemId> {
    raw.parse().map_err(|_| AppError::item_not_found())
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> AppResult<(StatusCode, Json<Value>)> {
    let items = state.store.list().await?;

    info!(count = items.len(), "Listed items");

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "data": items })),
    ))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Value>)> {
    let fields = parse_body(&body)?;
    let item = state.store.put(Item::create(fields)).await?;

    info!(id = item.id, "Created item");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": item })),
    ))
}

// ── Get by id ─────────────────────────────────────────────────────────────────

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let item = state.store.get(parse_id(&id)?).await?;

    info!(id = item.id, "Fetched item");

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "data": item })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Value>)> {
    let id = parse_id(&id)?;
    let patch = parse_body(&body)?;

    // Same request-level read-modify-write as every other mutation: the
    // collection is re-read here and written back in full.
    let mut items = state.store.load().await?;
    let pos = items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(AppError::item_not_found)?;
    items[pos].merge(patch);
    let merged = items[pos].clone();
    state.store.save(&items).await?;

    info!(id, "Updated item");

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "data": merged })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;

    info!(id, "Deleted item");

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Item deleted" })),
    ))
}
