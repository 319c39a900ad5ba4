// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Staking accounts for the local ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{paths::is_safe_component, FileStorage, StorageError, StorageResult};

/// Account stored in `staking/{user_id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StakingAccount {
    pub user_id: String,
    pub rair_balance: f64,
    pub rair_staked: f64,
    pub updated_at: DateTime<Utc>,
}

impl StakingAccount {
    pub fn opening(user_id: &str, starting_balance: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            rair_balance: starting_balance,
            rair_staked: 0.0,
            updated_at: Utc::now(),
        }
    }
}

pub struct StakingAccountRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> StakingAccountRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self, user_id: &str) -> StorageResult<Option<StakingAccount>> {
        check_id(user_id)?;
        self.storage
            .read_json_opt(self.storage.paths().staking_account(user_id))
    }

    pub fn save(&self, account: &StakingAccount) -> StorageResult<()> {
        check_id(&account.user_id)?;
        self.storage
            .write_json(self.storage.paths().staking_account(&account.user_id), account)
    }
}

fn check_id(user_id: &str) -> StorageResult<()> {
    if is_safe_component(user_id) {
        Ok(())
    } else {
        Err(StorageError::InvalidId(format!("user id {user_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    #[test]
    fn save_and_get() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let repo = StakingAccountRepository::new(&storage);

        assert!(repo.get("user-1").unwrap().is_none());

        let mut account = StakingAccount::opening("user-1", 500.0);
        account.rair_staked = 100.0;
        repo.save(&account).unwrap();

        assert_eq!(repo.get("user-1").unwrap(), Some(account));
        assert!(matches!(repo.get("a/b"), Err(StorageError::InvalidId(_))));
    }
}
