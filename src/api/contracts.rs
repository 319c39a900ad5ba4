// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    audit_log,
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::RegisterContractRequest,
    state::AppState,
    storage::{
        paths::is_safe_component, AuditEventType, ContractDeployment, ContractRepository,
        StorageError,
    },
    web3::{is_evm_address, is_tx_hash, WalletType},
};

/// List registered contract deployments
#[utoipa::path(
    get,
    path = "/contract",
    tag = "Contracts",
    responses(
        (
            status = 200,
            description = "All deployments, ordered by name",
            body = Vec<ContractDeployment>
        ),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_contracts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContractDeployment>>, ApiError> {
    ContractRepository::new(state.storage())
        .list()
        .map(Json)
        .map_err(|e| ApiError::storage("Failed to list contracts", e))
}

/// Get a contract deployment by name
#[utoipa::path(
    get,
    path = "/contract/{name}",
    tag = "Contracts",
    params(("name" = String, Path, description = "Registry name, e.g. RairToken")),
    responses(
        (status = 200, description = "Deployment", body = ContractDeployment),
        (status = 404, description = "Unknown contract", body = ErrorBody)
    )
)]
pub async fn get_contract(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ContractDeployment>, ApiError> {
    if !is_safe_component(&name) {
        return Err(ApiError::not_found(format!("Contract {name} not found")));
    }

    ContractRepository::new(state.storage())
        .get(&name)
        .map_err(|e| ApiError::storage("Failed to load contract", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Contract {name} not found")))
}

/// Register a contract deployment
///
/// The first user to register a name owns it. Only that user may replace
/// the entry afterwards.
#[utoipa::path(
    post,
    path = "/contract",
    tag = "Contracts",
    security(("bearer_auth" = [])),
    request_body = RegisterContractRequest,
    responses(
        (status = 201, description = "Deployment registered", body = ContractDeployment),
        (status = 400, description = "Invalid name, address or hash", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Name registered by another user", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn register_contract(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<RegisterContractRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContractDeployment>), ApiError> {
    let Json(req) = body?;

    if !is_safe_component(&req.name) {
        return Err(ApiError::bad_request(
            "Invalid contract name: use letters, digits, '_', '.' or '-'",
        ));
    }
    if !is_evm_address(&req.address) {
        return Err(ApiError::bad_request("Invalid contract address"));
    }
    if let Some(ref tx_hash) = req.tx_hash {
        if !is_tx_hash(WalletType::Ethereum, tx_hash) {
            return Err(ApiError::bad_request("Invalid transaction hash"));
        }
    }

    let deployment = ContractDeployment {
        name: req.name,
        chain_id: req.chain_id,
        address: req.address.to_ascii_lowercase(),
        tx_hash: req.tx_hash.map(|h| h.to_ascii_lowercase()),
        deployed_by: user.user_id.clone(),
        deployed_at: Utc::now(),
    };

    let storage = state.storage();
    ContractRepository::new(storage)
        .register(&deployment)
        .map_err(|e| match e {
            StorageError::PermissionDenied { .. } => {
                tracing::warn!(
                    user_id = %user.user_id,
                    name = %deployment.name,
                    "Contract name registered by another user"
                );
                ApiError::forbidden(format!(
                    "Contract {} is registered by another user",
                    deployment.name
                ))
            }
            other => ApiError::storage("Failed to register contract", other),
        })?;

    audit_log!(
        storage,
        AuditEventType::ContractRegistered,
        user,
        "contract",
        &deployment.name
    );
    tracing::info!(
        name = %deployment.name,
        chain_id = deployment.chain_id,
        address = %deployment.address,
        "Registered contract deployment"
    );

    Ok((StatusCode::CREATED, Json(deployment)))
}
