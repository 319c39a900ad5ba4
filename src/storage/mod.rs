// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage as JSON files under the configured data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   nonces/{wallet_address}.json      # Pending sign-in nonce
//!   profiles/{user_id}.json           # User profile
//!   staking/{user_id}.json            # Local staking ledger account
//!   wallets/{wallet_address}/
//!     link.json                       # Verified owner of the wallet
//!     txs/{id}.json                   # Recorded transactions
//!   collections/{slug}.json           # Marketplace collections (operator provided)
//!   contracts/{name}.json             # Contract deployment registry
//!   audit/
//!     {date}/events.jsonl             # Daily audit logs
//! ```
//!
//! ## Consistency
//!
//! - Every write replaces the whole file atomically (temp file + rename)
//! - Create-if-absent is enforced by the filesystem, not by a read-then-write
//! - Nonces are consumed by renaming them away, so only one reader wins

pub mod audit;
pub mod file_store;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use file_store::{FileStorage, StorageError, StorageResult};
pub use ownership::{OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{
    CollectionRepository, ContractDeployment, ContractRepository, NftCollection, NftItem,
    NonceRepository, Profile, ProfileRepository, StakingAccount, StakingAccountRepository,
    TransactionKind, TransactionRepository, WalletLink, WalletLinkRepository, WalletNonceRecord,
    WalletTransaction,
};
