// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{ErrorResponse, NonceRequest, NonceResponse, OutcomeResponse, RegisterRequest, VerifyRequest},
    state::AppState,
    storage::RegistrationRecord,
};

pub mod health;
pub mod identity;
pub mod register;
pub mod wallet_auth;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/nonce", post(wallet_auth::issue_nonce))
        .route("/verify", post(wallet_auth::verify))
        .route("/register", post(register::register_wallet))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet_auth::issue_nonce,
        wallet_auth::verify,
        register::register_wallet,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            NonceRequest,
            NonceResponse,
            VerifyRequest,
            RegisterRequest,
            OutcomeResponse,
            ErrorResponse,
            RegistrationRecord,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Nonce issuance and wallet ownership verification"),
        (name = "Registration", description = "Wallet registration ledger"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::clock::ManualClock;
    use crate::config::AppConfig;
    use crate::state::AppState;

    /// State backed by a fresh temporary data directory.
    pub fn test_state() -> (tempfile::TempDir, AppState) {
        test_state_with(AppConfig::default())
    }

    pub fn test_state_with(config: AppConfig) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..config
        };
        let state = AppState::new(config, Arc::new(ManualClock::default())).expect("state");
        (dir, state)
    }
}
