// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the file store layout.

use std::path::{Path, PathBuf};

/// Storage path utilities.
///
/// Every id passed to these helpers must already have been checked with
/// [`is_safe_component`]; the helpers join them into paths verbatim.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Wallet Nonce Paths ==========

    pub fn nonces_dir(&self) -> PathBuf {
        self.root.join("nonces")
    }

    /// Path to the pending nonce for a wallet address.
    pub fn nonce(&self, wallet_address: &str) -> PathBuf {
        self.nonces_dir().join(format!("{wallet_address}.json"))
    }

    // ========== Profile Paths ==========

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    pub fn profile(&self, user_id: &str) -> PathBuf {
        self.profiles_dir().join(format!("{user_id}.json"))
    }

    // ========== Staking Paths ==========

    pub fn staking_dir(&self) -> PathBuf {
        self.root.join("staking")
    }

    pub fn staking_account(&self, user_id: &str) -> PathBuf {
        self.staking_dir().join(format!("{user_id}.json"))
    }

    // ========== Wallet Paths ==========

    pub fn wallets_dir(&self) -> PathBuf {
        self.root.join("wallets")
    }

    /// Directory for a linked wallet.
    pub fn wallet_dir(&self, wallet_address: &str) -> PathBuf {
        self.wallets_dir().join(wallet_address)
    }

    /// Path to the wallet link (owner, type, verification time).
    pub fn wallet_link(&self, wallet_address: &str) -> PathBuf {
        self.wallet_dir(wallet_address).join("link.json")
    }

    /// Directory for wallet transaction history.
    pub fn wallet_txs_dir(&self, wallet_address: &str) -> PathBuf {
        self.wallet_dir(wallet_address).join("txs")
    }

    pub fn wallet_tx(&self, wallet_address: &str, tx_id: &str) -> PathBuf {
        self.wallet_txs_dir(wallet_address).join(format!("{tx_id}.json"))
    }

    // ========== Marketplace Paths ==========

    pub fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    pub fn collection(&self, slug: &str) -> PathBuf {
        self.collections_dir().join(format!("{slug}.json"))
    }

    // ========== Contract Paths ==========

    pub fn contracts_dir(&self) -> PathBuf {
        self.root.join("contracts")
    }

    pub fn contract(&self, name: &str) -> PathBuf {
        self.contracts_dir().join(format!("{name}.json"))
    }

    // ========== Audit Paths ==========

    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Daily audit log (`{date}` is `YYYY-MM-DD`).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date).join("events.jsonl")
    }
}

/// Whether `id` can be used as a single path component.
///
/// Accepts ASCII alphanumerics plus `-`, `_` and `.`, at most 128 bytes,
/// not starting with a dot.
pub fn is_safe_component(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && !id.starts_with('.')
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted() {
        let paths = StoragePaths::new("/tmp/store");
        assert_eq!(
            paths.nonce("0xabc"),
            PathBuf::from("/tmp/store/nonces/0xabc.json")
        );
        assert_eq!(
            paths.wallet_tx("0xabc", "tx-1"),
            PathBuf::from("/tmp/store/wallets/0xabc/txs/tx-1.json")
        );
        assert_eq!(
            paths.audit_events_file("2026-01-02"),
            PathBuf::from("/tmp/store/audit/2026-01-02/events.jsonl")
        );
    }

    #[test]
    fn safe_component_rejects_traversal() {
        assert!(is_safe_component("0x742d35cc6634c0532925a3b844bc9e7595f4ab12"));
        assert!(is_safe_component("6f1c9a0e-0b7e-4d3f-9c1e-2a7b3c4d5e6f"));
        assert!(is_safe_component("genesis-pass"));
        assert!(!is_safe_component(""));
        assert!(!is_safe_component(".."));
        assert!(!is_safe_component("../etc"));
        assert!(!is_safe_component("a/b"));
        assert!(!is_safe_component(".hidden"));
        assert!(!is_safe_component(&"a".repeat(129)));
    }
}
