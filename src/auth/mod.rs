// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session JWT authentication against the external identity provider.
//!
//! ## Auth Flow
//!
//! 1. The frontend signs the user in with the identity provider
//! 2. Requests carry the session JWT as `Authorization: Bearer <jwt>` or in
//!    the provider's session cookie (`sb-access-token` by default)
//! 3. The server:
//!    - Verifies the signature (provider JWKS, or the shared HS256 secret)
//!    - Checks expiry, and issuer/audience when configured
//!    - Extracts `sub` as the canonical `user_id`, plus email and role
//!
//! ## Security
//!
//! - Every protected endpoint verifies the token on every request
//! - There is no unverified mode; without a key source requests fail
//! - JWKS is cached with TTL for performance
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use jwks::JwksManager;

#[cfg(test)]
pub mod test_support {
    //! Helpers for minting identities and session tokens in tests.

    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::AuthenticatedUser;

    /// HS256 secret configured by `state::test_state`.
    pub const TEST_JWT_SECRET: &str = "test-project-jwt-secret";

    pub fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            email_verified: true,
            role: "authenticated".to_string(),
            session_id: None,
            issuer: None,
            expires_at: 0,
        }
    }

    fn sign(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    /// A valid session token for `user_id`.
    pub fn token_for(user_id: &str, email: Option<&str>) -> String {
        sign(json!({
            "sub": user_id,
            "exp": chrono::Utc::now().timestamp() + 3600,
            "email": email,
            "role": "authenticated",
            "user_metadata": { "email_verified": email.is_some() }
        }))
    }

    pub fn expired_token_for(user_id: &str) -> String {
        sign(json!({
            "sub": user_id,
            "exp": chrono::Utc::now().timestamp() - 3600,
        }))
    }

    pub fn bearer(user_id: &str) -> String {
        format!("Bearer {}", token_for(user_id, Some(&format!("{user_id}@example.com"))))
    }
}
