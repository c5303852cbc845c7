// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration of verified wallet addresses.
//!
//! Registration is a second, independently signed assertion: it does not
//! use the authentication nonce. The recovered signer must match the
//! submitted address, and each address is recorded at most once.

use std::sync::Arc;

use crate::config::RateLimitPolicy;
use crate::error::AuthError;
use crate::storage::{AppendOutcome, RegistrationLedger, RegistrationRecord};

use super::nonce::normalize;
use super::rate_limit::RateLimiter;
use super::signature::recover_signer;

pub struct RegistrationService {
    limiter: Arc<RateLimiter>,
    ledger: Arc<RegistrationLedger>,
    policy: RateLimitPolicy,
}

impl RegistrationService {
    pub fn new(
        limiter: Arc<RateLimiter>,
        ledger: Arc<RegistrationLedger>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            limiter,
            ledger,
            policy,
        }
    }

    pub fn ledger(&self) -> &RegistrationLedger {
        &self.ledger
    }

    /// Record `address` as registered.
    ///
    /// `timestamp` is the client's registration time in Unix milliseconds,
    /// stored as given.
    pub fn register(
        &self,
        identity: &str,
        address: &str,
        message: &str,
        signature: &str,
        timestamp: Option<i64>,
    ) -> Result<RegistrationRecord, AuthError> {
        if !self
            .limiter
            .allow(identity, self.policy.register, self.policy.window)
        {
            tracing::warn!(identity, "Registration rate limited");
            return Err(AuthError::RateLimited);
        }

        let Some(timestamp) = timestamp else {
            return Err(AuthError::MissingParameters);
        };
        if address.is_empty() || message.is_empty() || signature.is_empty() {
            return Err(AuthError::MissingParameters);
        }

        let recovered = recover_signer(message, signature).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed registration signature");
            AuthError::InvalidSignatureFormat
        })?;
        if normalize(&recovered.to_string()) != normalize(address) {
            return Err(AuthError::SignatureMismatch);
        }

        let record = RegistrationRecord::evm(address, timestamp);
        match self.ledger.append_unique(record.clone())? {
            AppendOutcome::Appended => {
                tracing::info!(address, timestamp, "Wallet registered");
                Ok(record)
            }
            AppendOutcome::Duplicate => Err(AuthError::AlreadyRegistered),
        }
    }
}
