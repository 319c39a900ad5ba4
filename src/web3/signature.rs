// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification.
//!
//! - Ethereum / Base: EIP-191 `personal_sign`. The 65-byte `r || s || v`
//!   signature is hex encoded; the signer address is recovered and compared
//!   with the claimed wallet.
//! - Solana: ed25519 over the raw message bytes. The signature is base58
//!   (wallet adapters' usual encoding) or hex; the public key is the wallet
//!   address itself.

use alloy::primitives::{Address, Signature};
use ring::signature::{UnparsedPublicKey, ED25519};

use super::{WalletAddress, WalletType};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature encoding is invalid: {0}")]
    Encoding(String),

    #[error("signature does not match wallet address")]
    Mismatch,
}

/// Verify that `signature` over `message` was produced by `address`.
pub fn verify_wallet_signature(
    wallet_type: WalletType,
    address: &WalletAddress,
    message: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    if wallet_type.is_evm() {
        verify_evm(address, message, signature)
    } else {
        verify_solana(address, message, signature)
    }
}

fn verify_evm(
    address: &WalletAddress,
    message: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let bytes = alloy::hex::decode(signature.trim())
        .map_err(|e| SignatureError::Encoding(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(SignatureError::Encoding(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let signature =
        Signature::from_raw(&bytes).map_err(|e| SignatureError::Encoding(e.to_string()))?;
    let expected: Address = address
        .as_str()
        .parse()
        .map_err(|_| SignatureError::Mismatch)?;

    match signature.recover_address_from_msg(message.as_bytes()) {
        Ok(recovered) if recovered == expected => Ok(()),
        _ => Err(SignatureError::Mismatch),
    }
}

fn verify_solana(
    address: &WalletAddress,
    message: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let public_key = bs58::decode(address.as_str())
        .into_vec()
        .map_err(|_| SignatureError::Mismatch)?;
    let signature = decode_ed25519_signature(signature.trim())?;

    UnparsedPublicKey::new(&ED25519, &public_key)
        .verify(message.as_bytes(), &signature)
        .map_err(|_| SignatureError::Mismatch)
}

fn decode_ed25519_signature(raw: &str) -> Result<Vec<u8>, SignatureError> {
    let bytes = match bs58::decode(raw).into_vec() {
        Ok(bytes) if bytes.len() == 64 => bytes,
        _ => alloy::hex::decode(raw).map_err(|e| SignatureError::Encoding(e.to_string()))?,
    };
    if bytes.len() != 64 {
        return Err(SignatureError::Encoding(format!(
            "expected 64 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};
    use ring::signature::{Ed25519KeyPair, KeyPair};

    // Well-known development key (Hardhat/Anvil account #0).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn evm_signer() -> (PrivateKeySigner, WalletAddress) {
        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        let address =
            WalletAddress::parse(WalletType::Ethereum, &signer.address().to_string()).unwrap();
        (signer, address)
    }

    fn solana_keypair() -> (Ed25519KeyPair, WalletAddress) {
        let keypair = Ed25519KeyPair::from_seed_unchecked(&[7u8; 32]).unwrap();
        let encoded = bs58::encode(keypair.public_key().as_ref()).into_string();
        let address = WalletAddress::parse(WalletType::Solana, &encoded).unwrap();
        (keypair, address)
    }

    #[test]
    fn evm_signature_from_wallet_verifies() {
        let (signer, address) = evm_signer();
        let message = "localhost wants you to sign in\nNonce: 1";
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        let encoded = alloy::hex::encode_prefixed(signature.as_bytes());

        assert_eq!(
            verify_wallet_signature(WalletType::Ethereum, &address, message, &encoded),
            Ok(())
        );
        assert_eq!(
            verify_wallet_signature(WalletType::Base, &address, message, &encoded),
            Ok(())
        );
    }

    #[test]
    fn evm_signature_over_other_message_is_rejected() {
        let (signer, address) = evm_signer();
        let signature = signer.sign_message_sync(b"Nonce: 1").unwrap();
        let encoded = alloy::hex::encode_prefixed(signature.as_bytes());

        assert_eq!(
            verify_wallet_signature(WalletType::Ethereum, &address, "Nonce: 2", &encoded),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn evm_signature_from_other_wallet_is_rejected() {
        let (signer, _) = evm_signer();
        let other = WalletAddress::parse(
            WalletType::Ethereum,
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
        )
        .unwrap();
        let signature = signer.sign_message_sync(b"hello").unwrap();
        let encoded = alloy::hex::encode_prefixed(signature.as_bytes());

        assert_eq!(
            verify_wallet_signature(WalletType::Ethereum, &other, "hello", &encoded),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn evm_signature_with_bad_encoding_is_rejected() {
        let (_, address) = evm_signer();
        assert!(matches!(
            verify_wallet_signature(WalletType::Ethereum, &address, "hello", "0xnothex"),
            Err(SignatureError::Encoding(_))
        ));
        assert!(matches!(
            verify_wallet_signature(WalletType::Ethereum, &address, "hello", "0xabcd"),
            Err(SignatureError::Encoding(_))
        ));
    }

    #[test]
    fn solana_signature_verifies_in_base58_and_hex() {
        let (keypair, address) = solana_keypair();
        let message = "localhost wants you to sign in\nNonce: 1";
        let signature = keypair.sign(message.as_bytes());

        let b58 = bs58::encode(signature.as_ref()).into_string();
        assert_eq!(
            verify_wallet_signature(WalletType::Solana, &address, message, &b58),
            Ok(())
        );

        let hex = alloy::hex::encode(signature.as_ref());
        assert_eq!(
            verify_wallet_signature(WalletType::Solana, &address, message, &hex),
            Ok(())
        );
    }

    #[test]
    fn solana_signature_over_other_message_is_rejected() {
        let (keypair, address) = solana_keypair();
        let signature = keypair.sign(b"Nonce: 1");
        let b58 = bs58::encode(signature.as_ref()).into_string();

        assert_eq!(
            verify_wallet_signature(WalletType::Solana, &address, "Nonce: 2", &b58),
            Err(SignatureError::Mismatch)
        );
    }
}
