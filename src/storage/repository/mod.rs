// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the file store.
//!
//! Each repository provides the operations for one entity type, using
//! [`FileStorage`](super::FileStorage) for all file access.

pub mod collections;
pub mod contracts;
pub mod nonces;
pub mod profiles;
pub mod staking;
pub mod transactions;
pub mod wallets;

pub use collections::{CollectionRepository, NftCollection, NftItem};
pub use contracts::{ContractDeployment, ContractRepository};
pub use nonces::{NonceRepository, WalletNonceRecord};
pub use profiles::{Profile, ProfileRepository};
pub use staking::{StakingAccount, StakingAccountRepository};
pub use transactions::{TransactionKind, TransactionRepository, WalletTransaction};
pub use wallets::{WalletLink, WalletLinkRepository};
