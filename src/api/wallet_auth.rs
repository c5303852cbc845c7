// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::{
    api::identity::ClientIdentity,
    error::AuthError,
    models::{ErrorResponse, NonceRequest, NonceResponse, OutcomeResponse, VerifyRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/nonce",
    request_body = NonceRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Nonce issued", body = NonceResponse),
        (status = 400, description = "No address provided", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    )
)]
pub async fn issue_nonce(
    State(state): State<AppState>,
    ClientIdentity(identity): ClientIdentity,
    payload: Result<Json<NonceRequest>, JsonRejection>,
) -> Result<Json<NonceResponse>, AuthError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let address = request.address.unwrap_or_default();

    let nonce = state.verification.issue_nonce(&identity, &address)?;
    Ok(Json(NonceResponse { nonce }))
}

#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Ownership verified", body = OutcomeResponse),
        (status = 400, description = "Verification failed", body = OutcomeResponse),
        (status = 429, description = "Too many requests", body = OutcomeResponse)
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    ClientIdentity(identity): ClientIdentity,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> (StatusCode, Json<OutcomeResponse>) {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    tracing::debug!(address = ?request.address, "Verify request received");

    let result = state.verification.verify(
        &identity,
        request.address.as_deref().unwrap_or_default(),
        request.nonce.as_deref().unwrap_or_default(),
        request.message.as_deref().unwrap_or_default(),
        request.signature.as_deref().unwrap_or_default(),
    );

    match result {
        Ok(()) => (StatusCode::OK, Json(OutcomeResponse::ok(None))),
        Err(e) => {
            e.log_if_internal();
            (e.status_code(), Json(OutcomeResponse::failed(&e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;
    use crate::auth::signature::{sign_in_message, test_support::*};

    fn nonce_request(address: &str) -> Result<Json<NonceRequest>, JsonRejection> {
        Ok(Json(NonceRequest {
            address: Some(address.to_string()),
        }))
    }

    #[tokio::test]
    async fn issue_then_verify() {
        let (_dir, state) = test_state();
        let alice = signer(ALICE_KEY);
        let address = address_of(&alice);

        let Json(NonceResponse { nonce }) = issue_nonce(
            State(state.clone()),
            ClientIdentity("1.2.3.4".into()),
            nonce_request(&address),
        )
        .await
        .expect("nonce issued");

        let message = sign_in_message(&address, &nonce);
        let (status, Json(body)) = verify(
            State(state.clone()),
            ClientIdentity("1.2.3.4".into()),
            Ok(Json(VerifyRequest {
                address: Some(address.clone()),
                nonce: Some(nonce),
                signature: Some(sign(&alice, &message)),
                message: Some(message),
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert!(state.nonces.is_empty());
    }

    #[tokio::test]
    async fn missing_address_is_rejected() {
        let (_dir, state) = test_state();
        let result = issue_nonce(
            State(state),
            ClientIdentity("1.2.3.4".into()),
            Ok(Json(NonceRequest::default())),
        )
        .await;

        match result {
            Err(err) => assert_eq!(err.status_code(), StatusCode::BAD_REQUEST),
            Ok(_) => panic!("expected missing address to fail"),
        }
    }

    #[tokio::test]
    async fn verify_without_fields_reports_missing_parameters() {
        let (_dir, state) = test_state();
        let (status, Json(body)) = verify(
            State(state),
            ClientIdentity("1.2.3.4".into()),
            Ok(Json(VerifyRequest::default())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error_code.as_deref(), Some("missing_parameters"));
    }
}
