// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::{
    api::identity::ClientIdentity,
    models::{OutcomeResponse, RegisterRequest},
    state::AppState,
};

/// Record a wallet in the registration ledger.
///
/// The body carries a fresh signature over a registration message; the
/// authentication nonce is not involved.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    tag = "Registration",
    responses(
        (status = 200, description = "Registration successful", body = OutcomeResponse),
        (status = 400, description = "Invalid signature or missing parameters", body = OutcomeResponse),
        (status = 409, description = "Wallet already registered", body = OutcomeResponse),
        (status = 429, description = "Too many registration attempts", body = OutcomeResponse),
        (status = 500, description = "Internal server error", body = OutcomeResponse)
    )
)]
pub async fn register_wallet(
    State(state): State<AppState>,
    ClientIdentity(identity): ClientIdentity,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> (StatusCode, Json<OutcomeResponse>) {
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let result = state.registration.register(
        &identity,
        request.address.as_deref().unwrap_or_default(),
        request.message.as_deref().unwrap_or_default(),
        request.signature.as_deref().unwrap_or_default(),
        request.timestamp,
    );

    match result {
        Ok(_) => (
            StatusCode::OK,
            Json(OutcomeResponse::ok(Some("Registration successful".to_string()))),
        ),
        Err(e) => {
            e.log_if_internal();
            (e.status_code(), Json(OutcomeResponse::failed(&e)))
        }
    }
}
