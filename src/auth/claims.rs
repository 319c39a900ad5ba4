// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by the identity provider's session JWT.
///
/// Only `sub` and `exp` are required; everything else is optional so tokens
/// from providers with slimmer payloads still verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration timestamp
    pub exp: i64,

    #[serde(default)]
    pub iat: Option<i64>,

    #[serde(default)]
    pub iss: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Provider role, e.g. `authenticated`
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

/// User metadata attached by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserMetadata {
    #[serde(default)]
    pub email_verified: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Authenticated user information extracted from JWT.
///
/// This is the primary type used throughout the application to represent
/// the authenticated user making a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim)
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub email_verified: bool,

    /// Provider role claim
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Original issuer (not serialized)
    #[serde(skip)]
    pub issuer: Option<String>,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: SessionClaims) -> Self {
        let email_verified = claims
            .user_metadata
            .as_ref()
            .and_then(|m| m.email_verified)
            .unwrap_or(false);

        Self {
            user_id: claims.sub,
            email: claims.email,
            email_verified,
            role: claims.role.unwrap_or_else(|| "authenticated".to_string()),
            session_id: claims.session_id,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims() -> SessionClaims {
        serde_json::from_value(json!({
            "sub": "6f1c9a0e-0b7e-4d3f-9a51-2f8c1d1e5b77",
            "exp": 1700003600,
            "iat": 1700000000,
            "iss": "https://project.example.co/auth/v1",
            "email": "alice@example.com",
            "role": "authenticated",
            "session_id": "sess_abc",
            "user_metadata": { "email_verified": true, "name": "Alice" }
        }))
        .unwrap()
    }

    #[test]
    fn from_claims_extracts_identity() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        assert_eq!(user.user_id, "6f1c9a0e-0b7e-4d3f-9a51-2f8c1d1e5b77");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert!(user.email_verified);
        assert_eq!(user.role, "authenticated");
        assert_eq!(user.session_id.as_deref(), Some("sess_abc"));
    }

    #[test]
    fn minimal_claims_get_defaults() {
        let claims: SessionClaims =
            serde_json::from_value(json!({ "sub": "user-1", "exp": 1 })).unwrap();
        let user = AuthenticatedUser::from_claims(claims);
        assert_eq!(user.email, None);
        assert!(!user.email_verified);
        assert_eq!(user.role, "authenticated");
    }

    #[test]
    fn internal_fields_are_not_serialized() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("issuer").is_none());
        assert!(value.get("expires_at").is_none());
    }
}
