// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified wallet links.
//!
//! ## Storage Layout
//!
//! ```text
//! wallets/{wallet_address}/
//!   link.json       # Owner of the wallet
//!   txs/            # Recorded transactions
//! ```
//!
//! A link is written when a signed-in user completes the wallet signature
//! handshake. Re-verifying from another account moves the link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, OwnedResource, StorageResult};
use crate::web3::{WalletAddress, WalletType};

/// Wallet link stored in `link.json`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WalletLink {
    pub wallet_address: WalletAddress,
    pub wallet_type: WalletType,
    /// Identity provider user id that proved ownership
    pub owner_user_id: String,
    pub verified_at: DateTime<Utc>,
}

impl OwnedResource for WalletLink {
    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }

    fn resource_label(&self) -> String {
        format!("wallet {}", self.wallet_address)
    }
}

pub struct WalletLinkRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> WalletLinkRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Link (or re-link) a wallet to its verified owner.
    pub fn upsert(&self, link: &WalletLink) -> StorageResult<()> {
        self.storage.write_json(
            self.storage.paths().wallet_link(link.wallet_address.as_str()),
            link,
        )
    }

    pub fn get(&self, wallet_address: &WalletAddress) -> StorageResult<Option<WalletLink>> {
        self.storage
            .read_json_opt(self.storage.paths().wallet_link(wallet_address.as_str()))
    }
}
