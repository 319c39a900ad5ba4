// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only NFT marketplace catalogue.
//!
//! Responses are served from the [`ResponseCache`](crate::cache::ResponseCache)
//! keyed by request path until they expire or are revalidated.

use axum::{
    extract::{Path, State},
    http::Uri,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ErrorBody},
    state::AppState,
    storage::{CollectionRepository, NftCollection},
};

/// Serve `path` from the cache, or render it with `load` and cache the result.
fn cached<T, F>(state: &AppState, path: &str, load: F) -> Result<Json<Value>, ApiError>
where
    T: Serialize,
    F: FnOnce() -> Result<T, ApiError>,
{
    if let Some(body) = state.cache.get(path) {
        tracing::debug!(path, "Response cache hit");
        return Ok(Json(body));
    }

    let body = serde_json::to_value(load()?).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize response");
        ApiError::internal("Failed to render response")
    })?;
    state.cache.put(path, body.clone());
    Ok(Json(body))
}

/// List NFT collections
#[utoipa::path(
    get,
    path = "/marketplace/collections",
    tag = "Marketplace",
    responses(
        (status = 200, description = "All collections", body = Vec<NftCollection>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_collections(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    cached(&state, uri.path(), || {
        CollectionRepository::new(state.storage())
            .list()
            .map_err(|e| ApiError::storage("Failed to list collections", e))
    })
}

/// Get a collection and its items
#[utoipa::path(
    get,
    path = "/marketplace/collections/{slug}",
    tag = "Marketplace",
    params(("slug" = String, Path, description = "Collection slug")),
    responses(
        (status = 200, description = "Collection", body = NftCollection),
        (status = 404, description = "Unknown collection", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_collection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    cached(&state, uri.path(), || {
        CollectionRepository::new(state.storage())
            .get_by_slug(&slug)
            .map_err(|e| ApiError::storage("Failed to load collection", e))?
            .ok_or_else(|| ApiError::not_found(format!("Collection {slug} not found")))
    })
}
