// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger boundary for staking operations.

use axum::http::StatusCode;

use super::StakingStatus;

/// Failure reported by a staking ledger.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient balance: {available} RAIR available, {requested} requested")]
    InsufficientBalance { available: f64, requested: f64 },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid amount: must be a positive number")]
    InvalidAmount,

    #[error("Ledger storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Stable code sent as `details` to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::NotAuthenticated => "not_authenticated",
            LedgerError::InvalidAmount => "invalid_amount",
            LedgerError::Storage(_) => "ledger_unavailable",
        }
    }

    /// HTTP status for each ledger failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,
            LedgerError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            LedgerError::InvalidAmount => StatusCode::BAD_REQUEST,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Debit/credit operations on a user's RAIR position.
///
/// Implementations own their consistency: `stake` must check and move the
/// balance as one step.
pub trait StakingLedger: Send + Sync {
    /// Move `amount` from the user's balance into their stake.
    fn stake(&self, user_id: &str, amount: f64) -> Result<(), LedgerError>;

    fn status(&self, user_id: &str) -> Result<StakingStatus, LedgerError>;
}
