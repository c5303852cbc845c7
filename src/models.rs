// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `ToSchema` for OpenAPI documentation.
//!
//! Request fields are optional at the serde level so that an absent field
//! is reported as `missing_parameters` by the service (after the rate-limit
//! check) rather than as a body-parsing rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AuthError;

// =============================================================================
// Nonce
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NonceRequest {
    /// Wallet address (`0x`-prefixed hex, any case).
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NonceResponse {
    /// 32 hex characters; embed it in the message to sign.
    pub nonce: String,
}

/// Error body of the nonce endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

// =============================================================================
// Verify / Register
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    #[serde(default)]
    pub address: Option<String>,
    /// Nonce previously issued for `address`.
    #[serde(default)]
    pub nonce: Option<String>,
    /// 65-byte `personal_sign` signature, hex encoded.
    #[serde(default)]
    pub signature: Option<String>,
    /// Exact text that was signed.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Client registration time, Unix milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Result body of the verify and register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OutcomeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl OutcomeResponse {
    pub fn ok(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            error_code: None,
        }
    }

    pub fn failed(error: &AuthError) -> Self {
        Self {
            success: false,
            message: Some(error.to_string()),
            error_code: Some(error.error_code().to_string()),
        }
    }
}
