// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet sign-in primitives.
//!
//! The handshake is:
//!
//! 1. Client posts `{walletAddress, walletType}` to `/auth/web3/nonce`.
//! 2. Server validates the address, stores a fresh nonce with an expiry and
//!    returns a human-readable message embedding address, nonce and domain.
//! 3. Client signs the message with the wallet and posts the signature to
//!    `/auth/web3/verify`.
//! 4. Server rebuilds the message from the stored record, checks expiry,
//!    verifies the signature and consumes the nonce.
//!
//! This module holds the pure parts: address rules per chain, nonce
//! generation, message formatting and signature checks.

pub mod nonce;
pub mod signature;
pub mod wallet;

pub use nonce::{generate_nonce, signing_message, NonceError};
pub use signature::{verify_wallet_signature, SignatureError};
pub use wallet::{is_evm_address, is_tx_hash, AddressError, WalletAddress, WalletType};
