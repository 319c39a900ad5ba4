// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet types and address validation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chains a wallet can sign in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Ethereum,
    Solana,
    /// Base L2; uses Ethereum-style addresses and signatures.
    Base,
}

impl WalletType {
    /// Parse a wallet type exactly as sent by clients (lowercase).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ethereum" => Some(Self::Ethereum),
            "solana" => Some(Self::Solana),
            "base" => Some(Self::Base),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Solana => "solana",
            Self::Base => "base",
        }
    }

    /// Name shown to the user in the signing message.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Solana => "Solana",
            Self::Base => "Base",
        }
    }

    pub fn is_evm(&self) -> bool {
        matches!(self, Self::Ethereum | Self::Base)
    }
}

impl std::fmt::Display for WalletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid {0} address format")]
    InvalidFormat(WalletType),
}

/// A wallet address that passed validation for its wallet type.
///
/// EVM addresses are stored lowercase so that checksummed and plain forms
/// map to the same nonce record. Solana addresses are base58 and kept
/// verbatim since base58 is case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(wallet_type: WalletType, raw: &str) -> Result<Self, AddressError> {
        let raw = raw.trim();
        let valid = if wallet_type.is_evm() {
            is_evm_address(raw)
        } else {
            is_solana_address(raw)
        };

        if !valid {
            return Err(AddressError::InvalidFormat(wallet_type));
        }

        Ok(if wallet_type.is_evm() {
            Self(raw.to_ascii_lowercase())
        } else {
            Self(raw.to_string())
        })
    }

    /// Parse an address whose wallet type is not known, such as a wallet id
    /// in a query string. `0x` addresses are EVM, everything else Solana.
    pub fn parse_any(raw: &str) -> Result<Self, AddressError> {
        if raw.trim().starts_with("0x") {
            Self::parse(WalletType::Ethereum, raw)
        } else {
            Self::parse(WalletType::Solana, raw)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// `^0x[a-fA-F0-9]{40}$`
pub fn is_evm_address(raw: &str) -> bool {
    raw.len() == 42
        && raw.starts_with("0x")
        && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// 32 to 44 base58 characters decoding to a 32-byte ed25519 public key.
pub fn is_solana_address(raw: &str) -> bool {
    (32..=44).contains(&raw.len())
        && bs58::decode(raw)
            .into_vec()
            .map(|bytes| bytes.len() == 32)
            .unwrap_or(false)
}

/// Transaction hash shape for the wallet's chain: `0x` + 64 hex characters
/// on EVM chains, a base58 64-byte signature on Solana.
pub fn is_tx_hash(wallet_type: WalletType, raw: &str) -> bool {
    if wallet_type.is_evm() {
        raw.len() == 66
            && raw.starts_with("0x")
            && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
    } else {
        (64..=88).contains(&raw.len())
            && bs58::decode(raw)
                .into_vec()
                .map(|bytes| bytes.len() == 64)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12";
    const SOL: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    #[test]
    fn wallet_type_parses_only_known_lowercase_names() {
        assert_eq!(WalletType::parse("ethereum"), Some(WalletType::Ethereum));
        assert_eq!(WalletType::parse("solana"), Some(WalletType::Solana));
        assert_eq!(WalletType::parse("base"), Some(WalletType::Base));
        assert_eq!(WalletType::parse("bitcoin"), None);
        assert_eq!(WalletType::parse("Ethereum"), None);
        assert_eq!(WalletType::parse(""), None);
    }

    #[test]
    fn evm_addresses_are_validated_and_lowercased() {
        let addr = WalletAddress::parse(WalletType::Ethereum, ETH).unwrap();
        assert_eq!(addr.as_str(), ETH.to_ascii_lowercase());

        let base = WalletAddress::parse(WalletType::Base, ETH).unwrap();
        assert_eq!(base, addr);
    }

    #[test]
    fn malformed_evm_addresses_are_rejected() {
        for bad in [
            "742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB1",
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB123",
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aBZZ",
            "0X742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
        ] {
            assert_eq!(
                WalletAddress::parse(WalletType::Ethereum, bad),
                Err(AddressError::InvalidFormat(WalletType::Ethereum)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn solana_addresses_must_decode_to_32_bytes() {
        let addr = WalletAddress::parse(WalletType::Solana, SOL).unwrap();
        assert_eq!(addr.as_str(), SOL);

        // Right length, but `0`, `O`, `I` and `l` are not in the base58 alphabet.
        let bad_alphabet = "0OIl".repeat(8);
        assert!(WalletAddress::parse(WalletType::Solana, &bad_alphabet).is_err());
        // Valid base58 that decodes to fewer than 32 bytes.
        assert!(WalletAddress::parse(WalletType::Solana, &"2".repeat(32)).is_err());
        // EVM address on the wrong chain.
        assert!(WalletAddress::parse(WalletType::Solana, ETH).is_err());
    }

    #[test]
    fn wallet_address_serializes_as_plain_string() {
        let addr = WalletAddress::parse(WalletType::Solana, SOL).unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), format!("\"{SOL}\""));
    }

    #[test]
    fn tx_hash_shape_follows_chain() {
        let evm_hash = format!("0x{}", "ab".repeat(32));
        assert!(is_tx_hash(WalletType::Base, &evm_hash));
        assert!(!is_tx_hash(WalletType::Ethereum, &evm_hash[..65]));
        assert!(!is_tx_hash(WalletType::Solana, &evm_hash));

        let sol_sig = bs58::encode([7u8; 64]).into_string();
        assert!(is_tx_hash(WalletType::Solana, &sol_sig));
        assert!(!is_tx_hash(WalletType::Ethereum, &sol_sig));
    }

    #[test]
    fn parse_any_picks_chain_from_shape() {
        assert_eq!(WalletAddress::parse_any(ETH).unwrap().as_str(), ETH.to_ascii_lowercase());
        assert_eq!(WalletAddress::parse_any(SOL).unwrap().as_str(), SOL);
        assert!(WalletAddress::parse_any("0x1234").is_err());
        assert!(WalletAddress::parse_any("not-a-wallet").is_err());
    }
}
