// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Ownership Server
//!
//! Challenge/response proof of control over an EVM keypair, followed by an
//! optional registration of the verified address in a deduplicated ledger.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Nonces, rate limiting, signature recovery and the two services
//! - `clock` - Injectable time source
//! - `storage` - Registration ledger on the local filesystem

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
