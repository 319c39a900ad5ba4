// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Stored records (profiles,
//! collections, deployments, transactions) are served as-is and live next
//! to their repositories in [`crate::storage::repository`].
//!
//! Wallet sign-in bodies use camelCase field names, as the wallet frontend
//! sends them; everything else is snake_case.
//!
//! Required fields of validated requests are `Option`s so that a missing
//! field is reported as a 400 by the handler rather than a body rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::staking::StakingStatus;
use crate::storage::{Profile, TransactionKind, WalletTransaction};
use crate::web3::{WalletAddress, WalletType};

// =============================================================================
// Session
// =============================================================================

/// The authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
}

// =============================================================================
// Wallet Sign-in
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    /// `0x` + 40 hex characters for ethereum/base, base58 for solana
    pub wallet_address: Option<String>,
    /// One of `ethereum`, `solana`, `base`
    pub wallet_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub nonce: String,
    /// Message the wallet must sign
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_address: Option<String>,
    /// Hex for ethereum/base (65 bytes), base58 or hex for solana (64 bytes)
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub wallet_address: WalletAddress,
    pub wallet_type: WalletType,
    /// Whether the wallet is now linked to the signed-in account
    pub linked: bool,
}

// =============================================================================
// Profiles
// =============================================================================

/// Longest accepted free-text profile field, in characters.
pub const MAX_PROFILE_TEXT_LEN: usize = 2000;

/// Partial profile update. Absent fields are left unchanged; identity
/// fields (`id`, `email`, `email_verified`, timestamps) are not accepted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_picture: Option<String>,
    pub about_me: Option<String>,
    pub bio: Option<String>,
    pub is_public: Option<bool>,
    pub onboarding_completed: Option<bool>,
}

impl ProfileChanges {
    /// Check field formats, returning a message fit for a 400 response.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref username) = self.username {
            if !is_valid_username(username) {
                return Err(
                    "Invalid username: use 3-32 letters, digits, '_', '.' or '-'".to_string(),
                );
            }
        }

        let texts = [
            ("full_name", &self.full_name),
            ("avatar_url", &self.avatar_url),
            ("profile_picture", &self.profile_picture),
            ("about_me", &self.about_me),
            ("bio", &self.bio),
        ];
        for (field, value) in texts {
            if value
                .as_ref()
                .is_some_and(|v| v.chars().count() > MAX_PROFILE_TEXT_LEN)
            {
                return Err(format!(
                    "Invalid {field}: longer than {MAX_PROFILE_TEXT_LEN} characters"
                ));
            }
        }
        Ok(())
    }
}

/// 3 to 32 characters of `[A-Za-z0-9_.-]`.
pub fn is_valid_username(username: &str) -> bool {
    (3..=32).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// What anyone may see of a public profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicProfile {
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_picture: Option<String>,
    pub about_me: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        Self {
            username: profile.username,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            profile_picture: profile.profile_picture,
            about_me: profile.about_me,
            bio: profile.bio,
            created_at: profile.created_at,
        }
    }
}

// =============================================================================
// Staking
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StakeRequest {
    /// RAIR to stake; must be a positive number
    #[schema(value_type = Option<f64>)]
    pub amount: Option<serde_json::Value>,
}

impl StakeRequest {
    /// The amount when it is a positive finite JSON number.
    pub fn valid_amount(&self) -> Option<f64> {
        self.amount
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|a| a.is_finite() && *a > 0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StakeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: StakingStatus,
}

// =============================================================================
// Contracts
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterContractRequest {
    pub name: String,
    pub chain_id: u64,
    pub address: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

// =============================================================================
// Wallet Transactions
// =============================================================================

/// Default page size of `GET /wallet/transactions`.
pub const DEFAULT_TX_LIMIT: i64 = 20;
/// Largest page size of `GET /wallet/transactions`.
pub const MAX_TX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionsQuery {
    /// Wallet address to list
    pub wallet_id: Option<String>,
    /// Page size, clamped to 1..=100 (default 20)
    pub limit: Option<i64>,
}

impl TransactionsQuery {
    pub fn effective_limit(&self) -> usize {
        // Clamped to 1..=100, so the cast is lossless.
        self.limit
            .unwrap_or(DEFAULT_TX_LIMIT)
            .clamp(1, MAX_TX_LIMIT) as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionsResponse {
    pub wallet_address: WalletAddress,
    pub transactions: Vec<WalletTransaction>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    pub wallet_id: String,
    pub tx_hash: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Cache Revalidation
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RevalidateRequest {
    /// Path to revalidate, must start with `/`
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub path: String,
    /// Unix time in milliseconds
    pub now: i64,
}
