// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pending wallet sign-in nonces.
//!
//! One file per wallet address under `nonces/`. Issuing a nonce overwrites
//! whatever was pending for that wallet, so only the latest nonce can ever
//! be verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStorage, StorageResult};
use crate::web3::{WalletAddress, WalletType};

/// Nonce record stored in `nonces/{wallet_address}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletNonceRecord {
    pub wallet_address: WalletAddress,
    pub wallet_type: WalletType,
    pub nonce: String,
    pub nonce_expires_at: DateTime<Utc>,
    /// Domain embedded in the signing message.
    pub domain: String,
    pub updated_at: DateTime<Utc>,
}

impl WalletNonceRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.nonce_expires_at
    }
}

pub struct NonceRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> NonceRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Insert or replace the pending nonce for the record's wallet.
    pub fn upsert(&self, record: &WalletNonceRecord) -> StorageResult<()> {
        self.storage.write_json(
            self.storage.paths().nonce(record.wallet_address.as_str()),
            record,
        )
    }

    /// Remove and return the pending nonce. At most one caller receives it.
    pub fn take(&self, wallet_address: &WalletAddress) -> StorageResult<Option<WalletNonceRecord>> {
        self.storage
            .take_json(self.storage.paths().nonce(wallet_address.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use chrono::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        (temp, storage)
    }

    fn stored(storage: &FileStorage, address: &WalletAddress) -> Option<WalletNonceRecord> {
        storage
            .read_json_opt(storage.paths().nonce(address.as_str()))
            .unwrap()
    }

    fn record(nonce: &str) -> WalletNonceRecord {
        let now = Utc::now();
        WalletNonceRecord {
            wallet_address: WalletAddress::parse(
                WalletType::Ethereum,
                "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
            )
            .unwrap(),
            wallet_type: WalletType::Ethereum,
            nonce: nonce.to_string(),
            nonce_expires_at: now + Duration::minutes(5),
            domain: "localhost".to_string(),
            updated_at: now,
        }
    }

    #[test]
    fn second_upsert_overwrites_first() {
        let (_temp, storage) = setup();
        let repo = NonceRepository::new(&storage);

        repo.upsert(&record("first")).unwrap();
        repo.upsert(&record("second")).unwrap();

        let current = stored(&storage, &record("x").wallet_address).unwrap();
        assert_eq!(current.nonce, "second");
    }

    #[test]
    fn take_consumes_the_record() {
        let (_temp, storage) = setup();
        let repo = NonceRepository::new(&storage);
        let rec = record("once");
        repo.upsert(&rec).unwrap();

        assert_eq!(repo.take(&rec.wallet_address).unwrap(), Some(rec.clone()));
        assert_eq!(repo.take(&rec.wallet_address).unwrap(), None);
        assert_eq!(stored(&storage, &rec.wallet_address), None);
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let rec = record("n");
        assert!(!rec.is_expired(rec.nonce_expires_at - Duration::seconds(1)));
        assert!(rec.is_expired(rec.nonce_expires_at));
    }
}
