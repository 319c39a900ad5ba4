// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Web3 Starter Server - wallet sign-in, profiles, staking and marketplace API
//!
//! Backend for the Web3 starter template. Sessions come from an external
//! identity provider; wallets prove ownership with a nonce signature
//! handshake; everything is persisted in a JSON file store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session JWT verification (JWKS or shared secret)
//! - `cache` - LRU response cache for read-only routes
//! - `staking` - RAIR staking ledger boundary
//! - `storage` - JSON file store, repositories and audit log
//! - `web3` - Wallet addresses, nonces and signature verification

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod staking;
pub mod state;
pub mod storage;
pub mod web3;
