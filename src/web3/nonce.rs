// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Nonce generation and the signing message.

use ring::rand::{SecureRandom, SystemRandom};

use super::{WalletAddress, WalletType};

/// Nonce entropy in bytes (hex-encoded to 64 characters).
pub const NONCE_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
#[error("system random number generator failed")]
pub struct NonceError;

/// Generate a hex-encoded random nonce from the OS CSPRNG.
pub fn generate_nonce(rng: &SystemRandom) -> Result<String, NonceError> {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.fill(&mut bytes).map_err(|_| NonceError)?;
    Ok(alloy::hex::encode(bytes))
}

/// Build the message a wallet signs to prove ownership.
///
/// The output depends only on its inputs, so verification can rebuild it
/// byte-for-byte from the stored nonce record.
pub fn signing_message(
    domain: &str,
    wallet_type: WalletType,
    address: &WalletAddress,
    nonce: &str,
) -> String {
    format!(
        "{domain} wants you to sign in with your {chain} account:\n\
         {address}\n\
         \n\
         Sign this message to prove you own this wallet. \
         This request will not trigger a blockchain transaction or cost any gas fees.\n\
         \n\
         Nonce: {nonce}",
        chain = wallet_type.display_name(),
    )
}

/// Reduce a `Host` header value to something safe to embed in the message.
///
/// Returns `None` for empty or suspicious values so callers fall back to the
/// configured domain.
pub fn sanitize_domain(raw: &str) -> Option<String> {
    let host = raw.trim();
    let valid = !host.is_empty()
        && host.len() <= 253
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':'));
    valid.then(|| host.to_ascii_lowercase())
}
