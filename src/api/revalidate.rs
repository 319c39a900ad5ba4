// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{RevalidateRequest, RevalidateResponse},
    state::AppState,
    storage::{AuditEvent, AuditEventType, AuditRepository},
};

/// Drop cached responses for a path and everything below it
#[utoipa::path(
    post,
    path = "/revalidate",
    tag = "Cache",
    security(("bearer_auth" = [])),
    request_body = RevalidateRequest,
    responses(
        (status = 200, description = "Cache revalidated", body = RevalidateResponse),
        (status = 400, description = "Path missing or not absolute", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn revalidate(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<RevalidateRequest>, JsonRejection>,
) -> Result<Json<RevalidateResponse>, ApiError> {
    let Json(req) = body?;
    let path = req
        .path
        .filter(|p| p.starts_with('/'))
        .ok_or_else(|| ApiError::bad_request("Invalid path: must start with '/'"))?;

    let evicted = state.cache.invalidate_path(&path);

    AuditRepository::new(state.storage()).record(
        AuditEvent::new(AuditEventType::CacheRevalidated)
            .with_user(&user.user_id)
            .with_resource("path", path.as_str())
            .with_details(json!({ "evicted": evicted })),
    );
    tracing::info!(path = %path, evicted, "Revalidated cached responses");

    Ok(Json(RevalidateResponse {
        revalidated: true,
        path,
        now: Utc::now().timestamp_millis(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::user;
    use crate::state::test_state;
    use axum::http::StatusCode;

    fn body(path: Option<&str>) -> Result<Json<RevalidateRequest>, JsonRejection> {
        Ok(Json(RevalidateRequest {
            path: path.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn evicts_path_and_children() {
        let (state, _temp) = test_state();
        state.cache.put("/marketplace/collections", json!([]));
        state.cache.put("/marketplace/collections/genesis", json!({}));
        state.cache.put("/marketplace-stats", json!({}));

        let before = Utc::now().timestamp_millis();
        let Json(response) = revalidate(
            Auth(user("user-1")),
            State(state.clone()),
            body(Some("/marketplace/collections")),
        )
        .await
        .unwrap();

        assert!(response.revalidated);
        assert_eq!(response.path, "/marketplace/collections");
        assert!(response.now >= before);
        assert!(state.cache.get("/marketplace/collections").is_none());
        assert!(state.cache.get("/marketplace/collections/genesis").is_none());
        assert!(state.cache.get("/marketplace-stats").is_some());
    }

    #[tokio::test]
    async fn relative_or_missing_path_is_bad_request() {
        let (state, _temp) = test_state();
        for path in [None, Some(""), Some("marketplace")] {
            let err = revalidate(Auth(user("user-1")), State(state.clone()), body(path))
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{path:?}");
        }
    }
}
