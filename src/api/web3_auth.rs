// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet sign-in endpoints.
//!
//! `POST /auth/web3/nonce` issues a single-use nonce and the message to sign;
//! `POST /auth/web3/verify` checks the signature against the pending nonce.
//! The nonce is consumed by the first verification attempt whatever its
//! outcome, so a signature can never be tried twice against the same nonce.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::HOST, HeaderMap},
    Json,
};
use chrono::{TimeDelta, Utc};
use serde_json::json;

use crate::{
    auth::OptionalAuth,
    error::{ApiError, ErrorBody},
    models::{NonceRequest, NonceResponse, VerifyRequest, VerifyResponse},
    state::AppState,
    storage::{
        AuditEvent, AuditEventType, AuditRepository, NonceRepository, WalletLink,
        WalletLinkRepository, WalletNonceRecord,
    },
    web3::{
        generate_nonce, nonce::sanitize_domain, signing_message, verify_wallet_signature,
        SignatureError, WalletAddress, WalletType,
    },
};

/// Issue a sign-in nonce for a wallet.
///
/// Any nonce previously issued for the same wallet is replaced.
#[utoipa::path(
    post,
    path = "/auth/web3/nonce",
    tag = "Auth",
    request_body = NonceRequest,
    responses(
        (status = 200, description = "Nonce issued", body = NonceResponse),
        (status = 400, description = "Missing or invalid wallet address or type", body = ErrorBody),
        (status = 500, description = "Failed to store nonce", body = ErrorBody)
    )
)]
pub async fn issue_nonce(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NonceRequest>, JsonRejection>,
) -> Result<Json<NonceResponse>, ApiError> {
    let Json(request) = body?;

    let (Some(raw_address), Some(raw_type)) = (
        request.wallet_address.filter(|s| !s.trim().is_empty()),
        request.wallet_type.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Wallet address and wallet type are required",
        ));
    };

    let wallet_type = WalletType::parse(&raw_type).ok_or_else(|| {
        ApiError::bad_request("Invalid wallet type. Must be ethereum, solana, or base")
    })?;
    let wallet_address = WalletAddress::parse(wallet_type, &raw_address)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let nonce = generate_nonce(&state.rng).map_err(|e| {
        tracing::error!(error = %e, "Nonce generation failed");
        ApiError::internal("Failed to generate nonce")
    })?;

    let domain = request_domain(&headers, &state.config.signing_domain);
    let message = signing_message(&domain, wallet_type, &wallet_address, &nonce);

    let now = Utc::now();
    let nonce_expires_at = TimeDelta::from_std(state.config.nonce_ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            tracing::error!(ttl = ?state.config.nonce_ttl, "Nonce lifetime out of range");
            ApiError::internal("Failed to issue nonce")
        })?;
    let record = WalletNonceRecord {
        wallet_address: wallet_address.clone(),
        wallet_type,
        nonce: nonce.clone(),
        nonce_expires_at,
        domain,
        updated_at: now,
    };

    let storage = state.storage();
    NonceRepository::new(storage)
        .upsert(&record)
        .map_err(|e| ApiError::storage("Failed to store nonce", e))?;

    AuditRepository::new(storage).record(
        AuditEvent::new(AuditEventType::NonceIssued)
            .with_resource("wallet", wallet_address.as_str())
            .with_details(json!({ "wallet_type": wallet_type })),
    );
    tracing::info!(wallet = %wallet_address, %wallet_type, "Issued wallet sign-in nonce");

    Ok(Json(NonceResponse {
        nonce,
        message,
        expires_at: record.nonce_expires_at,
    }))
}

/// Verify a signed sign-in message.
///
/// When the caller is signed in, the wallet is linked to their account.
#[utoipa::path(
    post,
    path = "/auth/web3/verify",
    tag = "Auth",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Signature verified", body = VerifyResponse),
        (status = 400, description = "Invalid input or no pending nonce", body = ErrorBody),
        (status = 401, description = "Nonce expired or signature mismatch", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn verify_signature(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(request) = body?;

    let (Some(raw_address), Some(signature)) = (
        request.wallet_address.filter(|s| !s.trim().is_empty()),
        request.signature.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Wallet address and signature are required",
        ));
    };

    let wallet_address = WalletAddress::parse_any(&raw_address)
        .map_err(|_| ApiError::bad_request("Invalid wallet address"))?;

    let storage = state.storage();
    let audit = AuditRepository::new(storage);

    let record = NonceRepository::new(storage)
        .take(&wallet_address)
        .map_err(|e| ApiError::storage("Failed to load nonce", e))?
        .ok_or_else(|| ApiError::bad_request("No pending nonce for this wallet"))?;

    let failure = |reason: &str| {
        AuditEvent::new(AuditEventType::WalletVerificationFailed)
            .with_resource("wallet", wallet_address.as_str())
            .failed(reason)
    };

    if record.is_expired(Utc::now()) {
        audit.record(failure("nonce expired"));
        return Err(ApiError::unauthorized("Nonce expired. Request a new one."));
    }

    let message = signing_message(
        &record.domain,
        record.wallet_type,
        &record.wallet_address,
        &record.nonce,
    );

    if let Err(e) =
        verify_wallet_signature(record.wallet_type, &record.wallet_address, &message, &signature)
    {
        audit.record(failure(&e.to_string()));
        return Err(match e {
            SignatureError::Encoding(_) => {
                ApiError::bad_request("Invalid signature encoding").with_details(e.to_string())
            }
            SignatureError::Mismatch => ApiError::unauthorized("Invalid signature"),
        });
    }

    let mut verified = AuditEvent::new(AuditEventType::WalletVerified)
        .with_resource("wallet", record.wallet_address.as_str());

    let linked = match user {
        Some(ref user) => {
            let link = WalletLink {
                wallet_address: record.wallet_address.clone(),
                wallet_type: record.wallet_type,
                owner_user_id: user.user_id.clone(),
                verified_at: Utc::now(),
            };
            WalletLinkRepository::new(storage)
                .upsert(&link)
                .map_err(|e| ApiError::storage("Failed to link wallet", e))?;

            audit.record(
                AuditEvent::new(AuditEventType::WalletLinked)
                    .with_user(&user.user_id)
                    .with_resource("wallet", record.wallet_address.as_str()),
            );
            verified = verified.with_user(&user.user_id);
            true
        }
        None => false,
    };
    audit.record(verified);

    tracing::info!(wallet = %record.wallet_address, linked, "Wallet signature verified");

    Ok(Json(VerifyResponse {
        success: true,
        wallet_address: record.wallet_address,
        wallet_type: record.wallet_type,
        linked,
    }))
}

/// Domain to embed in the signing message: the request's `Host` when it is
/// a plain host name, otherwise the configured fallback.
fn request_domain(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(sanitize_domain)
        .unwrap_or_else(|| fallback.to_string())
}
