// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction history of wallets linked to the caller.
//!
//! A wallet belongs to whoever last completed the signature handshake for it
//! while signed in; every other caller gets 403.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    audit_log,
    auth::{Auth, AuthenticatedUser},
    error::{ApiError, ErrorBody},
    models::{RecordTransactionRequest, TransactionsQuery, TransactionsResponse},
    state::AppState,
    storage::{
        AuditEventType, OwnershipCheck, StorageError, TransactionRepository, WalletLink,
        WalletLinkRepository, WalletTransaction,
    },
    web3::{is_tx_hash, WalletAddress},
};

/// Resolve `raw` to a wallet linked to `user`.
fn owned_wallet(
    state: &AppState,
    user: &AuthenticatedUser,
    raw: &str,
) -> Result<WalletLink, ApiError> {
    let address =
        WalletAddress::parse_any(raw).map_err(|_| ApiError::bad_request("Invalid wallet address"))?;

    WalletLinkRepository::new(state.storage())
        .get(&address)
        .verify_owner(user)
        .map_err(|e| match e {
            StorageError::NotFound(_) | StorageError::PermissionDenied { .. } => {
                tracing::debug!(
                    user_id = %user.user_id,
                    wallet = %address,
                    "Wallet not owned by caller"
                );
                ApiError::forbidden("Wallet not owned by caller")
            }
            other => ApiError::storage("Failed to load wallet", other),
        })
}

/// List a wallet's recent transactions
#[utoipa::path(
    get,
    path = "/wallet/transactions",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    params(TransactionsQuery),
    responses(
        (status = 200, description = "Newest transactions first", body = TransactionsResponse),
        (status = 400, description = "Missing or invalid walletId", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Wallet not owned by caller", body = ErrorBody)
    )
)]
pub async fn list_wallet_transactions(
    Auth(user): Auth,
    State(state): State<AppState>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let Query(query) = query?;
    let raw = query
        .wallet_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("walletId is required"))?;

    let link = owned_wallet(&state, &user, raw)?;

    let transactions = TransactionRepository::new(state.storage())
        .list_recent(&link.wallet_address, query.effective_limit())
        .map_err(|e| ApiError::storage("Failed to list transactions", e))?;

    Ok(Json(TransactionsResponse {
        wallet_address: link.wallet_address,
        transactions,
    }))
}

/// Record a transaction for an owned wallet
#[utoipa::path(
    post,
    path = "/wallet/transactions",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    request_body = RecordTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = WalletTransaction),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Wallet not owned by caller", body = ErrorBody)
    )
)]
pub async fn record_wallet_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<RecordTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletTransaction>), ApiError> {
    let Json(req) = body?;
    let link = owned_wallet(&state, &user, &req.wallet_id)?;

    if !is_tx_hash(link.wallet_type, &req.tx_hash) {
        return Err(ApiError::bad_request(format!(
            "Invalid transaction hash for {} wallet",
            link.wallet_type
        )));
    }

    let tx_hash = if link.wallet_type.is_evm() {
        req.tx_hash.to_ascii_lowercase()
    } else {
        req.tx_hash
    };
    let tx = WalletTransaction::new(
        link.wallet_address,
        tx_hash,
        req.kind,
        req.amount,
        req.description,
    );

    let storage = state.storage();
    TransactionRepository::new(storage)
        .create(&tx)
        .map_err(|e| ApiError::storage("Failed to record transaction", e))?;

    audit_log!(
        storage,
        AuditEventType::TransactionRecorded,
        user,
        "transaction",
        tx.id.to_string()
    );

    Ok((StatusCode::CREATED, Json(tx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::user;
    use crate::state::test_state;
    use crate::storage::TransactionKind;
    use crate::web3::WalletType;
    use chrono::Utc;

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12";

    fn link_wallet(state: &AppState, owner: &str) {
        let link = WalletLink {
            wallet_address: WalletAddress::parse(WalletType::Ethereum, WALLET).unwrap(),
            wallet_type: WalletType::Ethereum,
            owner_user_id: owner.to_string(),
            verified_at: Utc::now(),
        };
        WalletLinkRepository::new(state.storage()).upsert(&link).unwrap();
    }

    fn record(hash_byte: u8) -> Result<Json<RecordTransactionRequest>, JsonRejection> {
        Ok(Json(RecordTransactionRequest {
            wallet_id: WALLET.to_string(),
            tx_hash: format!("0x{}", format!("{hash_byte:02x}").repeat(32)),
            kind: TransactionKind::Transfer,
            amount: Some("1.5".into()),
            description: None,
        }))
    }

    fn query(
        wallet_id: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Query<TransactionsQuery>, QueryRejection> {
        Ok(Query(TransactionsQuery {
            wallet_id: wallet_id.map(str::to_string),
            limit,
        }))
    }

    #[tokio::test]
    async fn owner_records_and_lists_newest_first() {
        let (state, _temp) = test_state();
        link_wallet(&state, "user-1");

        for byte in [1u8, 2, 3] {
            let caller = Auth(user("user-1"));
            let (status, _) = record_wallet_transaction(caller, State(state.clone()), record(byte))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::CREATED);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let Json(page) = list_wallet_transactions(
            Auth(user("user-1")),
            State(state),
            query(Some(&WALLET.to_ascii_uppercase().replace("0X", "0x")), Some(2)),
        )
        .await
        .unwrap();

        assert_eq!(page.wallet_address.as_str(), WALLET.to_ascii_lowercase());
        assert_eq!(page.transactions.len(), 2);
        assert!(page.transactions[0].tx_hash.starts_with("0x0303"));
        assert!(page.transactions[1].tx_hash.starts_with("0x0202"));
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let (state, _temp) = test_state();
        link_wallet(&state, "user-1");

        let caller = Auth(user("user-2"));
        let err = list_wallet_transactions(caller, State(state.clone()), query(Some(WALLET), None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err = record_wallet_transaction(Auth(user("user-2")), State(state), record(1))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unlinked_wallet_is_forbidden() {
        let (state, _temp) = test_state();
        let caller = Auth(user("user-1"));
        let err = list_wallet_transactions(caller, State(state), query(Some(WALLET), None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_or_malformed_wallet_id_is_bad_request() {
        let (state, _temp) = test_state();
        for wallet_id in [None, Some(""), Some("0x1234")] {
            let caller = Auth(user("user-1"));
            let err = list_wallet_transactions(caller, State(state.clone()), query(wallet_id, None))
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{wallet_id:?}");
        }
    }

    #[tokio::test]
    async fn malformed_hash_is_bad_request() {
        let (state, _temp) = test_state();
        link_wallet(&state, "user-1");

        let body = Ok(Json(RecordTransactionRequest {
            wallet_id: WALLET.to_string(),
            tx_hash: "0xabc".into(),
            kind: TransactionKind::Other,
            amount: None,
            description: None,
        }));
        let err = record_wallet_transaction(Auth(user("user-1")), State(state), body)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
