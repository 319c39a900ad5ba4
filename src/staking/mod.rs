// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RAIR staking.
//!
//! The HTTP layer talks to a [`StakingLedger`]; it never reads balances
//! itself. Both the stake path and the status path derive superguide access
//! through [`StakingStatus::from_amounts`], so they cannot disagree.

pub mod ledger;
pub mod local;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use ledger::{LedgerError, StakingLedger};
pub use local::LocalStakingLedger;

/// Staking position as reported to clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StakingStatus {
    pub rair_balance: f64,
    pub rair_staked: f64,
    /// `true` once `rair_staked` reaches the superguide threshold
    pub has_superguide_access: bool,
}

impl StakingStatus {
    pub fn from_amounts(rair_balance: f64, rair_staked: f64, threshold: f64) -> Self {
        Self {
            rair_balance,
            rair_staked,
            has_superguide_access: rair_staked >= threshold,
        }
    }
}
