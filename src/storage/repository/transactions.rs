// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet transaction history.
//!
//! ## Storage Layout
//!
//! Transactions are stored per-wallet in the txs/ directory:
//! ```text
//! wallets/{wallet_address}/txs/
//!   {id}.json     # Individual transaction record
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::{FileStorage, StorageError, StorageResult};
use crate::web3::WalletAddress;

/// Kind of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Transfer,
    Mint,
    Purchase,
    Stake,
    Other,
}

/// Stored transaction record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_address: WalletAddress,
    /// On-chain transaction hash
    pub tx_hash: String,
    pub kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        wallet_address: WalletAddress,
        tx_hash: String,
        kind: TransactionKind,
        amount: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_address,
            tx_hash,
            kind,
            amount,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Repository for wallet transaction records.
pub struct TransactionRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Store a new transaction record.
    pub fn create(&self, tx: &WalletTransaction) -> StorageResult<()> {
        let id = tx.id.to_string();
        let path = self.storage.paths().wallet_tx(tx.wallet_address.as_str(), &id);
        self.storage.create_json(path, tx).map_err(|e| match e {
            StorageError::AlreadyExists(_) => {
                StorageError::AlreadyExists(format!("Transaction {id}"))
            }
            other => other,
        })
    }

    /// The wallet's most recent transactions, newest first.
    pub fn list_recent(
        &self,
        wallet_address: &WalletAddress,
        limit: usize,
    ) -> StorageResult<Vec<WalletTransaction>> {
        let txs_dir = self.storage.paths().wallet_txs_dir(wallet_address.as_str());
        let files = self.storage.list_files(&txs_dir, "json")?;

        let mut transactions = Vec::with_capacity(files.len());
        for file in files {
            let path = txs_dir.join(format!("{file}.json"));
            match self.storage.read_json::<WalletTransaction>(&path) {
                Ok(tx) => transactions.push(tx),
                Err(e) => {
                    tracing::warn!(tx_id = %file, error = %e, "Skipping unreadable transaction");
                }
            }
        }

        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions.truncate(limit);
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use crate::web3::WalletType;
    use chrono::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        (temp, storage)
    }

    fn address() -> WalletAddress {
        WalletAddress::parse(WalletType::Ethereum, "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12")
            .unwrap()
    }

    fn tx_at(minutes_ago: i64) -> WalletTransaction {
        let mut tx = WalletTransaction::new(
            address(),
            format!("0x{minutes_ago:064x}"),
            TransactionKind::Transfer,
            Some("1.5".to_string()),
            None,
        );
        tx.created_at = Utc::now() - Duration::minutes(minutes_ago);
        tx
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let (_temp, storage) = setup();
        let repo = TransactionRepository::new(&storage);

        for minutes in [30, 10, 20, 40] {
            repo.create(&tx_at(minutes)).unwrap();
        }

        let listed = repo.list_recent(&address(), 3).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].created_at > listed[1].created_at);
        assert!(listed[1].created_at > listed[2].created_at);
        assert_eq!(listed[0].tx_hash, format!("0x{:064x}", 10));
    }

    #[test]
    fn list_for_unknown_wallet_is_empty() {
        let (_temp, storage) = setup();
        let repo = TransactionRepository::new(&storage);
        assert!(repo.list_recent(&address(), 20).unwrap().is_empty());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let (_temp, storage) = setup();
        let repo = TransactionRepository::new(&storage);
        let tx = tx_at(1);
        repo.create(&tx).unwrap();
        assert!(matches!(repo.create(&tx), Err(StorageError::AlreadyExists(_))));
    }
}
