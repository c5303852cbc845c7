// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outcome taxonomy shared by the verification and registration flows.
//!
//! Every variant is a user-facing result. Storage and internal faults are
//! logged where they happen and rendered without their detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Missing parameters")]
    MissingParameters,
    #[error("Nonce not found")]
    NonceNotFound,
    #[error("Invalid nonce")]
    InvalidNonce,
    #[error("Invalid signature")]
    InvalidSignatureFormat,
    #[error("Signature verification failed")]
    SignatureMismatch,
    /// Rendered as 409 Conflict rather than a generic 400.
    #[error("Wallet already registered")]
    AlreadyRegistered,
    #[error("Internal server error")]
    StorageFailure(#[source] StorageError),
    #[error("Internal server error")]
    InternalError(String),
}

impl AuthError {
    /// Stable machine-readable code for this outcome.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::RateLimited => "rate_limited",
            AuthError::MissingParameters => "missing_parameters",
            AuthError::NonceNotFound => "nonce_not_found",
            AuthError::InvalidNonce => "invalid_nonce",
            AuthError::InvalidSignatureFormat => "invalid_signature_format",
            AuthError::SignatureMismatch => "signature_mismatch",
            AuthError::AlreadyRegistered => "already_registered",
            AuthError::StorageFailure(_) => "storage_failure",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::MissingParameters
            | AuthError::NonceNotFound
            | AuthError::InvalidNonce
            | AuthError::InvalidSignatureFormat
            | AuthError::SignatureMismatch => StatusCode::BAD_REQUEST,
            AuthError::AlreadyRegistered => StatusCode::CONFLICT,
            AuthError::StorageFailure(_) | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log server-side faults with their detail. Client errors are not logged.
    pub fn log_if_internal(&self) {
        match self {
            AuthError::StorageFailure(e) => {
                tracing::error!(error = %e, "Registration ledger storage failure");
            }
            AuthError::InternalError(detail) => {
                tracing::error!(error = %detail, "Internal error");
            }
            _ => {}
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::StorageFailure(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log_if_internal();
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AuthError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AuthError::InvalidNonce.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::AlreadyRegistered.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InternalError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn rate_limited_renders_error_body() {
        let response = AuthError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "rate_limited");
        assert_eq!(body["error"], "Too many requests. Please try again later.");
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let response = AuthError::InternalError("secret path /etc/x".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(!body.contains("secret"));
        assert!(body.contains("Internal server error"));
    }
}
