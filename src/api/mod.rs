// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{MatchedPath, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{
        NonceRequest, NonceResponse, ProfileChanges, PublicProfile, RecordTransactionRequest,
        RegisterContractRequest, RevalidateRequest, RevalidateResponse, SessionUserResponse,
        StakeRequest, StakeResponse, TransactionsResponse, VerifyRequest, VerifyResponse,
    },
    staking::StakingStatus,
    state::AppState,
    storage::{
        ContractDeployment, NftCollection, NftItem, Profile, TransactionKind, WalletTransaction,
    },
    web3::{WalletAddress, WalletType},
};

pub mod contracts;
pub mod health;
pub mod marketplace;
pub mod profiles;
pub mod revalidate;
pub mod staking;
pub mod users;
pub mod wallet_transactions;
pub mod web3_auth;

/// Build the application router.
///
/// Route groups switched off in [`FeatureFlags`](crate::config::FeatureFlags)
/// are not mounted and answer 404.
pub fn router(state: AppState) -> Router {
    let features = state.config.features;

    let mut routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/auth/user", get(users::get_current_user))
        .route(
            "/profile",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route("/profiles/{username}", get(profiles::get_public_profile))
        .route(
            "/contract",
            get(contracts::list_contracts).post(contracts::register_contract),
        )
        .route("/contract/{name}", get(contracts::get_contract))
        .route(
            "/wallet/transactions",
            get(wallet_transactions::list_wallet_transactions)
                .post(wallet_transactions::record_wallet_transaction),
        )
        .route("/revalidate", post(revalidate::revalidate));

    if features.web3_auth {
        routes = routes
            .route("/auth/web3/nonce", post(web3_auth::issue_nonce))
            .route("/auth/web3/verify", post(web3_auth::verify_signature));
    }
    if features.staking {
        routes = routes
            .route("/staking/stake", post(staking::stake))
            .route("/staking/status", get(staking::staking_status));
    }
    if features.marketplace {
        routes = routes
            .route(
                "/marketplace/collections",
                get(marketplace::list_collections),
            )
            .route(
                "/marketplace/collections/{slug}",
                get(marketplace::get_collection),
            );
    }

    let trace_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str);
        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        tracing::info_span!(
            "request",
            method = %req.method(),
            uri = %req.uri(),
            matched_path,
            request_id,
        )
    });

    routes
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace_layer)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::get_current_user,
        web3_auth::issue_nonce,
        web3_auth::verify_signature,
        profiles::get_profile,
        profiles::update_profile,
        profiles::get_public_profile,
        staking::stake,
        staking::staking_status,
        marketplace::list_collections,
        marketplace::get_collection,
        contracts::list_contracts,
        contracts::get_contract,
        contracts::register_contract,
        wallet_transactions::list_wallet_transactions,
        wallet_transactions::record_wallet_transaction,
        revalidate::revalidate
    ),
    components(
        schemas(
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            SessionUserResponse,
            WalletAddress,
            WalletType,
            NonceRequest,
            NonceResponse,
            VerifyRequest,
            VerifyResponse,
            Profile,
            ProfileChanges,
            PublicProfile,
            StakeRequest,
            StakeResponse,
            StakingStatus,
            NftCollection,
            NftItem,
            ContractDeployment,
            RegisterContractRequest,
            TransactionKind,
            WalletTransaction,
            TransactionsResponse,
            RecordTransactionRequest,
            RevalidateRequest,
            RevalidateResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Session identity and wallet signature sign-in"),
        (name = "Profiles", description = "User profiles"),
        (name = "Staking", description = "RAIR staking"),
        (name = "Marketplace", description = "NFT collections"),
        (name = "Contracts", description = "Contract deployment registry"),
        (name = "Wallet", description = "Wallet transaction history"),
        (name = "Cache", description = "Response cache revalidation")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{bearer, token_for};
    use crate::config::AppConfig;
    use crate::state::{test_state, test_state_with};
    use alloy::signers::{local::PrivateKeySigner, SignerSync};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _temp) = test_state();
        let app = router(state);
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let (state, _temp) = test_state();
        let app = router(state);

        for request in [
            get("/auth/user", None),
            get("/profile", None),
            get("/staking/status", None),
            get("/wallet/transactions?walletId=0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12", None),
            post_json("/revalidate", None, json!({ "path": "/" })),
            post_json("/contract", Some("Bearer not-a-jwt"), json!({})),
        ] {
            let uri = request.uri().to_string();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn unauthenticated_stake_has_no_side_effects() {
        let (state, _temp) = test_state();
        let app = router(state.clone());

        let request = post_json("/staking/stake", None, json!({ "amount": 100 }));
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let accounts = state
            .storage()
            .list_files(state.storage().paths().staking_dir(), "json")
            .unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn negative_stake_is_rejected_with_message() {
        let (state, _temp) = test_state();
        let app = router(state);

        let (status, body) = send(
            &app,
            post_json("/staking/stake", Some(&bearer("user-1")), json!({ "amount": -5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid amount"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (state, _temp) = test_state();
        let app = router(state);

        let request = Request::post("/auth/web3/nonce")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn unknown_wallet_type_is_bad_request() {
        let (state, _temp) = test_state();
        let app = router(state);

        let (status, _) = send(
            &app,
            post_json(
                "/auth/web3/nonce",
                None,
                json!({
                    "walletAddress": "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
                    "walletType": "bitcoin"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_cookie_is_accepted() {
        let (state, _temp) = test_state();
        let app = router(state);

        let request = Request::get("/auth/user")
            .header(
                header::COOKIE,
                format!("theme=dark; sb-access-token={}", token_for("user-9", None)),
            )
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "user-9");
        assert_eq!(body["role"], "authenticated");
    }

    #[tokio::test]
    async fn wallet_sign_in_links_wallet_and_unlocks_history() {
        let (state, _temp) = test_state();
        let app = router(state);
        let session = bearer("user-1");
        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        let address = signer.address().to_string();

        let (status, issued) = send(
            &app,
            post_json(
                "/auth/web3/nonce",
                None,
                json!({ "walletAddress": address, "walletType": "ethereum" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let message = issued["message"].as_str().unwrap();
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        let (status, verified) = send(
            &app,
            post_json(
                "/auth/web3/verify",
                Some(&session),
                json!({
                    "walletAddress": address,
                    "signature": alloy::hex::encode_prefixed(signature.as_bytes())
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["linked"], true);
        assert_eq!(verified["walletType"], "ethereum");

        let (status, history) = send(
            &app,
            get(&format!("/wallet/transactions?walletId={address}&limit=5"), Some(&session)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["transactions"], json!([]));

        let (status, _) = send(
            &app,
            get(&format!("/wallet/transactions?walletId={address}"), Some(&bearer("user-2"))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_limit_is_bad_request() {
        let (state, _temp) = test_state();
        let app = router(state);

        let (status, _) = send(
            &app,
            get("/wallet/transactions?walletId=x&limit=lots", Some(&bearer("user-1"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn disabled_features_are_not_mounted() {
        let mut config = AppConfig::default();
        config.features.web3_auth = false;
        config.features.staking = false;
        config.features.marketplace = false;
        let (state, _temp) = test_state_with(config);
        let app = router(state);

        for request in [
            post_json("/auth/web3/nonce", None, json!({})),
            get("/staking/status", Some(&bearer("user-1"))),
            get("/marketplace/collections", None),
        ] {
            let uri = request.uri().to_string();
            let (status, _) = send(&app, request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }

        let (status, _) = send(&app, get("/health/live", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _temp) = test_state();
        let app = router(state);

        let response = app.clone().oneshot(get("/health/live", None)).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let request = Request::get("/health/live")
            .header("x-request-id", "trace-me")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "trace-me");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (state, _temp) = test_state();
        let app = router(state);

        let (status, doc) = send(&app, get("/api-doc/openapi.json", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/auth/web3/nonce"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
