// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RAIR staking endpoints, relayed to the configured [`StakingLedger`].
//!
//! [`StakingLedger`]: crate::staking::StakingLedger

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::json;

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{StakeRequest, StakeResponse},
    staking::{LedgerError, StakingStatus},
    state::AppState,
    storage::{AuditEvent, AuditEventType, AuditRepository},
};

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        if matches!(err, LedgerError::Storage(_)) {
            tracing::error!(error = %err, "Staking ledger failure");
        }
        ApiError::new(err.status_code(), err.to_string()).with_details(err.error_code())
    }
}

/// Stake RAIR
///
/// Moves `amount` from the caller's balance into their stake and returns the
/// resulting position.
#[utoipa::path(
    post,
    path = "/staking/stake",
    tag = "Staking",
    security(("bearer_auth" = [])),
    request_body = StakeRequest,
    responses(
        (status = 200, description = "Stake accepted", body = StakeResponse),
        (status = 400, description = "Invalid amount or insufficient balance", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Ledger failure", body = ErrorBody)
    )
)]
pub async fn stake(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<StakeRequest>, JsonRejection>,
) -> Result<Json<StakeResponse>, ApiError> {
    let Json(request) = body?;
    let amount = request
        .valid_amount()
        .ok_or_else(|| ApiError::from(LedgerError::InvalidAmount))?;

    let audit = AuditRepository::new(state.storage());
    let event = AuditEvent::new(AuditEventType::StakeSubmitted)
        .with_user(&user.user_id)
        .with_details(json!({ "amount": amount }));

    if let Err(e) = state.ledger.stake(&user.user_id, amount) {
        audit.record(
            AuditEvent::new(AuditEventType::StakeRejected)
                .with_user(&user.user_id)
                .with_details(json!({ "amount": amount }))
                .failed(e.error_code()),
        );
        return Err(e.into());
    }
    audit.record(event);

    let status = state.ledger.status(&user.user_id)?;
    tracing::info!(
        user_id = %user.user_id,
        amount,
        staked = status.rair_staked,
        superguide = status.has_superguide_access,
        "Stake accepted"
    );

    Ok(Json(StakeResponse {
        success: true,
        status,
    }))
}

/// Get the caller's staking position
#[utoipa::path(
    get,
    path = "/staking/status",
    tag = "Staking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staking position", body = StakingStatus),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Ledger failure", body = ErrorBody)
    )
)]
pub async fn staking_status(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StakingStatus>, ApiError> {
    Ok(Json(state.ledger.status(&user.user_id)?))
}
