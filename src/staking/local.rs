// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed staking ledger.
//!
//! Accounts live in `staking/{user_id}.json`. A user without an account has
//! the configured starting balance and nothing staked; the account file is
//! written on the first stake.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::{LedgerError, StakingLedger, StakingStatus};
use crate::storage::{FileStorage, StakingAccount, StakingAccountRepository, StorageError};

pub struct LocalStakingLedger {
    storage: Arc<FileStorage>,
    /// Serializes read-check-write of accounts.
    write_lock: Mutex<()>,
    starting_balance: f64,
    superguide_threshold: f64,
}

impl LocalStakingLedger {
    pub fn new(
        storage: Arc<FileStorage>,
        starting_balance: f64,
        superguide_threshold: f64,
    ) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            starting_balance,
            superguide_threshold,
        }
    }

    fn load(&self, user_id: &str) -> Result<StakingAccount, LedgerError> {
        let account = StakingAccountRepository::new(&self.storage)
            .get(user_id)
            .map_err(storage_error)?;
        Ok(account.unwrap_or_else(|| StakingAccount::opening(user_id, self.starting_balance)))
    }
}

impl StakingLedger for LocalStakingLedger {
    fn stake(&self, user_id: &str, amount: f64) -> Result<(), LedgerError> {
        if user_id.is_empty() {
            return Err(LedgerError::NotAuthenticated);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount);
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| LedgerError::Storage("ledger lock poisoned".to_string()))?;

        let mut account = self.load(user_id)?;
        if account.rair_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: account.rair_balance,
                requested: amount,
            });
        }

        account.rair_balance -= amount;
        account.rair_staked += amount;
        account.updated_at = Utc::now();

        StakingAccountRepository::new(&self.storage)
            .save(&account)
            .map_err(storage_error)
    }

    fn status(&self, user_id: &str) -> Result<StakingStatus, LedgerError> {
        if user_id.is_empty() {
            return Err(LedgerError::NotAuthenticated);
        }
        let account = self.load(user_id)?;
        Ok(StakingStatus::from_amounts(
            account.rair_balance,
            account.rair_staked,
            self.superguide_threshold,
        ))
    }
}

fn storage_error(e: StorageError) -> LedgerError {
    LedgerError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn ledger(starting_balance: f64) -> (TempDir, LocalStakingLedger) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let ledger = LocalStakingLedger::new(Arc::new(storage), starting_balance, 3000.0);
        (temp, ledger)
    }

    #[test]
    fn new_account_has_starting_balance() {
        let (_temp, ledger) = ledger(5000.0);
        let status = ledger.status("user-1").unwrap();
        assert_eq!(status, StakingStatus::from_amounts(5000.0, 0.0, 3000.0));
        assert!(!status.has_superguide_access);
    }

    #[test]
    fn stake_moves_balance() {
        let (_temp, ledger) = ledger(5000.0);
        ledger.stake("user-1", 1200.5).unwrap();

        let status = ledger.status("user-1").unwrap();
        assert_eq!(status.rair_balance, 3799.5);
        assert_eq!(status.rair_staked, 1200.5);
        assert!(!status.has_superguide_access);

        ledger.stake("user-1", 1799.5).unwrap();
        assert!(ledger.status("user-1").unwrap().has_superguide_access);
    }

    #[test]
    fn stake_beyond_balance_is_rejected() {
        let (_temp, ledger) = ledger(100.0);
        let err = ledger.stake("user-1", 100.01).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.status("user-1").unwrap().rair_staked, 0.0);
    }

    #[test]
    fn invalid_amounts_and_anonymous_callers() {
        let (_temp, ledger) = ledger(100.0);
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert_eq!(ledger.stake("user-1", amount), Err(LedgerError::InvalidAmount));
        }
        assert_eq!(ledger.stake("", 1.0), Err(LedgerError::NotAuthenticated));
        assert_eq!(ledger.status(""), Err(LedgerError::NotAuthenticated));
    }

    #[test]
    fn concurrent_stakes_never_overdraw() {
        let (_temp, ledger) = ledger(1000.0);
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.stake("user-1", 300.0).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 3);
        let status = ledger.status("user-1").unwrap();
        assert_eq!(status.rair_staked, 900.0);
        assert_eq!(status.rair_balance, 100.0);
    }
}
