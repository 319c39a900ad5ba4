// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session user endpoint.

use axum::Json;

use crate::auth::{Auth, AuthenticatedUser};
use crate::error::ErrorBody;
use crate::models::SessionUserResponse;

impl From<AuthenticatedUser> for SessionUserResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Get the current authenticated user's identity.
#[utoipa::path(
    get,
    path = "/auth/user",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = SessionUserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorBody),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<SessionUserResponse> {
    Json(user.into())
}
