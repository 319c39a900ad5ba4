// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use ring::rand::SystemRandom;

use crate::auth::{AuthError, JwksManager};
use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::staking::{LocalStakingLedger, StakingLedger};
use crate::storage::FileStorage;

/// How session tokens are verified.
#[derive(Clone)]
pub struct AuthConfig {
    /// Provider JWKS; takes precedence over `jwt_secret`
    pub jwks: Option<Arc<JwksManager>>,
    /// Shared HS256 secret
    pub jwt_secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Session cookie read when no `Authorization` header is sent
    pub cookie_name: String,
}

impl AuthConfig {
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let jwks = config
            .auth
            .jwks_url
            .clone()
            .map(JwksManager::new)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            jwks,
            jwt_secret: config.auth.jwt_secret.clone(),
            issuer: config.auth.issuer.clone(),
            audience: config.auth.audience.clone(),
            cookie_name: config.auth.cookie_name.clone(),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub config: Arc<AppConfig>,
    pub auth_config: AuthConfig,
    pub ledger: Arc<dyn StakingLedger>,
    pub cache: Arc<ResponseCache>,
    pub rng: SystemRandom,
}

impl AppState {
    /// Wire the default collaborators: local staking ledger and an empty
    /// response cache sized from the config.
    pub fn new(storage: FileStorage, config: AppConfig, auth_config: AuthConfig) -> Self {
        let storage = Arc::new(storage);
        let ledger = LocalStakingLedger::new(
            Arc::clone(&storage),
            config.staking_starting_balance,
            config.superguide_threshold,
        );
        let cache = ResponseCache::new(config.cache_capacity, config.cache_ttl);

        Self {
            storage,
            config: Arc::new(config),
            auth_config,
            ledger: Arc::new(ledger),
            cache: Arc::new(cache),
            rng: SystemRandom::new(),
        }
    }

    /// Replace the staking ledger.
    pub fn with_ledger(mut self, ledger: Arc<dyn StakingLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }
}

/// State over a temp directory with HS256 auth using
/// [`TEST_JWT_SECRET`](crate::auth::test_support::TEST_JWT_SECRET).
#[cfg(test)]
pub fn test_state() -> (AppState, tempfile::TempDir) {
    test_state_with(AppConfig::default())
}

#[cfg(test)]
pub fn test_state_with(mut config: AppConfig) -> (AppState, tempfile::TempDir) {
    use crate::storage::StoragePaths;

    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    config.data_dir = temp_dir.path().to_path_buf();

    let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
    storage.initialize().expect("Failed to initialize storage");

    let auth_config = AuthConfig {
        jwks: None,
        jwt_secret: Some(crate::auth::test_support::TEST_JWT_SECRET.to_string()),
        issuer: None,
        audience: None,
        cookie_name: config.auth.cookie_name.clone(),
    };

    (AppState::new(storage, config, auth_config), temp_dir)
}
