// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All settings are read from the environment exactly once at startup and
//! collected into [`AppConfig`], which is then carried in `AppState`. Nothing
//! else in the crate reads the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory of the JSON file store | `./data` |
//! | `AUTH_JWKS_URL` | JWKS endpoint for RS/ES-signed session tokens (https) | unset |
//! | `AUTH_JWT_SECRET` | HS256 secret, used when no JWKS URL is set | unset |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | unset |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | unset |
//! | `AUTH_COOKIE_NAME` | Cookie carrying the session token | `sb-access-token` |
//! | `SIGNING_DOMAIN` | Domain used in signing messages when `Host` is absent | `localhost` |
//! | `NONCE_TTL_SECS` | Lifetime of a wallet nonce | `300` |
//! | `SUPERGUIDE_THRESHOLD` | Staked RAIR needed for superguide access | `3000` |
//! | `STAKING_STARTING_BALANCE` | RAIR balance given to new ledger accounts | `0` |
//! | `CACHE_TTL_SECS` | Marketplace response cache TTL | `60` |
//! | `CACHE_CAPACITY` | Marketplace response cache entries | `256` |
//! | `ENABLE_WEB3_AUTH` | Mount `/auth/web3/*` | `true` |
//! | `ENABLE_STAKING` | Mount `/staking/*` | `true` |
//! | `ENABLE_MARKETPLACE` | Mount `/marketplace/*` | `true` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; both set enables HTTPS | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_JWT_SECRET_ENV: &str = "AUTH_JWT_SECRET";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_COOKIE_NAME_ENV: &str = "AUTH_COOKIE_NAME";
pub const SIGNING_DOMAIN_ENV: &str = "SIGNING_DOMAIN";
pub const NONCE_TTL_SECS_ENV: &str = "NONCE_TTL_SECS";
pub const SUPERGUIDE_THRESHOLD_ENV: &str = "SUPERGUIDE_THRESHOLD";
pub const STAKING_STARTING_BALANCE_ENV: &str = "STAKING_STARTING_BALANCE";
pub const CACHE_TTL_SECS_ENV: &str = "CACHE_TTL_SECS";
pub const CACHE_CAPACITY_ENV: &str = "CACHE_CAPACITY";
pub const ENABLE_WEB3_AUTH_ENV: &str = "ENABLE_WEB3_AUTH";
pub const ENABLE_STAKING_ENV: &str = "ENABLE_STAKING";
pub const ENABLE_MARKETPLACE_ENV: &str = "ENABLE_MARKETPLACE";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default nonce lifetime (5 minutes).
pub const DEFAULT_NONCE_TTL_SECS: u64 = 300;

/// Upper bound on `NONCE_TTL_SECS` (one day).
pub const MAX_NONCE_TTL_SECS: u64 = 86_400;

/// Staked RAIR required before superguide access is granted.
pub const DEFAULT_SUPERGUIDE_THRESHOLD: f64 = 3000.0;

pub const DEFAULT_AUTH_COOKIE_NAME: &str = "sb-access-token";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Which route groups are mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub web3_auth: bool,
    pub staking: bool,
    pub marketplace: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            web3_auth: true,
            staking: true,
            marketplace: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Session token verification settings.
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub jwks_url: Option<Url>,
    pub jwt_secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub auth: AuthSettings,
    pub signing_domain: String,
    pub nonce_ttl: Duration,
    pub superguide_threshold: f64,
    pub staking_starting_balance: f64,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub features: FeatureFlags,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("./data"),
            auth: AuthSettings {
                cookie_name: DEFAULT_AUTH_COOKIE_NAME.to_string(),
                ..AuthSettings::default()
            },
            signing_domain: "localhost".to_string(),
            nonce_ttl: Duration::from_secs(DEFAULT_NONCE_TTL_SECS),
            superguide_threshold: DEFAULT_SUPERGUIDE_THRESHOLD,
            staking_starting_balance: 0.0,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 256,
            features: FeatureFlags::default(),
            tls: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = get(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(get(PORT_ENV), PORT_ENV, 8080)?;
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    key: HOST_ENV,
                    value: host.clone(),
                    reason: e.to_string(),
                })?;

        let jwks_url = match get(AUTH_JWKS_URL_ENV) {
            Some(raw) => {
                let url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    key: AUTH_JWKS_URL_ENV,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if url.scheme() != "https" {
                    return Err(ConfigError::Invalid {
                        key: AUTH_JWKS_URL_ENV,
                        value: raw,
                        reason: "JWKS must be fetched over https".to_string(),
                    });
                }
                Some(url)
            }
            None => None,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()) {
            None => LogFormat::Pretty,
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: LOG_FORMAT_ENV,
                    value: v,
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        let superguide_threshold = parse_or(
            get(SUPERGUIDE_THRESHOLD_ENV),
            SUPERGUIDE_THRESHOLD_ENV,
            DEFAULT_SUPERGUIDE_THRESHOLD,
        )?;
        ensure_non_negative(SUPERGUIDE_THRESHOLD_ENV, superguide_threshold)?;

        let staking_starting_balance =
            parse_or(get(STAKING_STARTING_BALANCE_ENV), STAKING_STARTING_BALANCE_ENV, 0.0)?;
        ensure_non_negative(STAKING_STARTING_BALANCE_ENV, staking_starting_balance)?;

        let nonce_ttl_secs =
            parse_or(get(NONCE_TTL_SECS_ENV), NONCE_TTL_SECS_ENV, DEFAULT_NONCE_TTL_SECS)?;
        if !(1..=MAX_NONCE_TTL_SECS).contains(&nonce_ttl_secs) {
            return Err(ConfigError::Invalid {
                key: NONCE_TTL_SECS_ENV,
                value: nonce_ttl_secs.to_string(),
                reason: format!("must be between 1 and {MAX_NONCE_TTL_SECS} seconds"),
            });
        }

        Ok(Self {
            bind_addr,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            auth: AuthSettings {
                jwks_url,
                jwt_secret: get(AUTH_JWT_SECRET_ENV),
                issuer: get(AUTH_ISSUER_ENV),
                audience: get(AUTH_AUDIENCE_ENV),
                cookie_name: get(AUTH_COOKIE_NAME_ENV)
                    .unwrap_or_else(|| DEFAULT_AUTH_COOKIE_NAME.to_string()),
            },
            signing_domain: get(SIGNING_DOMAIN_ENV).unwrap_or(defaults.signing_domain),
            nonce_ttl: Duration::from_secs(nonce_ttl_secs),
            superguide_threshold,
            staking_starting_balance,
            cache_ttl: Duration::from_secs(parse_or(
                get(CACHE_TTL_SECS_ENV),
                CACHE_TTL_SECS_ENV,
                60,
            )?),
            cache_capacity: parse_or(get(CACHE_CAPACITY_ENV), CACHE_CAPACITY_ENV, 256)?,
            features: FeatureFlags {
                web3_auth: parse_flag(get(ENABLE_WEB3_AUTH_ENV), ENABLE_WEB3_AUTH_ENV)?,
                staking: parse_flag(get(ENABLE_STAKING_ENV), ENABLE_STAKING_ENV)?,
                marketplace: parse_flag(get(ENABLE_MARKETPLACE_ENV), ENABLE_MARKETPLACE_ENV)?,
            },
            tls,
            log_format,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn parse_flag(raw: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(true),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: v.clone(),
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

fn ensure_non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be a non-negative number".to_string(),
        })
    }
}
