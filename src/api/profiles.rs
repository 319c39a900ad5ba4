// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    audit_log,
    auth::{Auth, AuthenticatedUser},
    error::{ApiError, ErrorBody},
    models::{ProfileChanges, PublicProfile},
    state::AppState,
    storage::{AuditEventType, Profile, ProfileRepository},
};

/// Load the caller's profile, creating it with defaults on first visit.
fn load_or_create(state: &AppState, user: &AuthenticatedUser) -> Result<Profile, ApiError> {
    let storage = state.storage();
    let defaults = Profile::new_default(
        &user.user_id,
        user.email.as_deref(),
        user.email_verified,
        Utc::now(),
    );

    let (profile, created) = ProfileRepository::new(storage)
        .get_or_create(defaults)
        .map_err(|e| ApiError::storage("Failed to load profile", e))?;

    if created {
        audit_log!(storage, AuditEventType::ProfileCreated, user, "profile", &profile.id);
        tracing::info!(user_id = %user.user_id, username = %profile.username, "Created profile");
    }
    Ok(profile)
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200,
            description = "Caller's profile, created on first visit",
            body = Profile
        ),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    load_or_create(&state, &user).map(Json)
}

/// Update the caller's profile
///
/// Only fields present in the body change.
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    request_body = ProfileChanges,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid field value", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<ProfileChanges>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let Json(changes) = body?;
    changes.validate().map_err(ApiError::bad_request)?;

    let storage = state.storage();
    let repo = ProfileRepository::new(storage);

    if let Some(ref username) = changes.username {
        let taken = repo
            .is_username_taken(username, &user.user_id)
            .map_err(|e| ApiError::storage("Failed to check username", e))?;
        if taken {
            return Err(ApiError::new(StatusCode::CONFLICT, "Username already taken"));
        }
    }

    let mut profile = load_or_create(&state, &user)?;
    profile.merge(changes, Utc::now());
    repo.update(&profile)
        .map_err(|e| ApiError::storage("Failed to update profile", e))?;

    audit_log!(storage, AuditEventType::ProfileUpdated, user, "profile", &profile.id);

    Ok(Json(profile))
}

/// Get a public profile by username
#[utoipa::path(
    get,
    path = "/profiles/{username}",
    tag = "Profiles",
    params(("username" = String, Path, description = "Username (case-insensitive)")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "No public profile with that username", body = ErrorBody)
    )
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    ProfileRepository::new(state.storage())
        .find_public_by_username(&username)
        .map_err(|e| ApiError::storage("Failed to load profile", e))?
        .map(|profile| Json(profile.into()))
        .ok_or_else(|| ApiError::not_found("Profile not found"))
}
