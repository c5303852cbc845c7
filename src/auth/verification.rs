// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Nonce issuance and signature verification.
//!
//! ## Verification Flow
//!
//! 1. Rate-limit the caller identity
//! 2. Require address, nonce, message and signature
//! 3. Look up the stored nonce for the lowercased address
//! 4. Require the claimed nonce to equal the stored one exactly
//! 5. Recover the signer of the message
//! 6. Compare the signer with the claimed address (case-insensitive)
//! 7. Consume the nonce
//!
//! The nonce is only consumed on success, so a failed attempt can be
//! retried after requesting a fresh nonce. The message itself is not
//! parsed; the client is responsible for embedding the nonce in it.

use std::sync::Arc;

use crate::config::RateLimitPolicy;
use crate::error::AuthError;

use super::nonce::{normalize, NonceStore};
use super::rate_limit::RateLimiter;
use super::signature::recover_signer;

pub struct VerificationService {
    limiter: Arc<RateLimiter>,
    nonces: Arc<NonceStore>,
    policy: RateLimitPolicy,
}

impl VerificationService {
    pub fn new(limiter: Arc<RateLimiter>, nonces: Arc<NonceStore>, policy: RateLimitPolicy) -> Self {
        Self {
            limiter,
            nonces,
            policy,
        }
    }

    pub fn nonces(&self) -> &NonceStore {
        &self.nonces
    }

    /// Issue a fresh challenge nonce for `address`.
    pub fn issue_nonce(&self, identity: &str, address: &str) -> Result<String, AuthError> {
        if !self
            .limiter
            .allow(identity, self.policy.nonce, self.policy.window)
        {
            tracing::warn!(identity, "Nonce request rate limited");
            return Err(AuthError::RateLimited);
        }

        if address.is_empty() {
            return Err(AuthError::MissingParameters);
        }

        let nonce = self.nonces.issue(address)?;
        tracing::info!(address = %normalize(address), "Issued nonce");
        Ok(nonce)
    }

    /// Check that `signature` over `message` was produced by `address` for
    /// the nonce previously issued to it.
    pub fn verify(
        &self,
        identity: &str,
        address: &str,
        claimed_nonce: &str,
        message: &str,
        signature: &str,
    ) -> Result<(), AuthError> {
        if !self
            .limiter
            .allow(identity, self.policy.verify, self.policy.window)
        {
            tracing::warn!(identity, "Verify request rate limited");
            return Err(AuthError::RateLimited);
        }

        if [address, claimed_nonce, message, signature]
            .iter()
            .any(|value| value.is_empty())
        {
            return Err(AuthError::MissingParameters);
        }

        let stored = self.nonces.peek(address).ok_or(AuthError::NonceNotFound)?;
        if stored != claimed_nonce {
            return Err(AuthError::InvalidNonce);
        }

        let recovered = recover_signer(message, signature).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed signature");
            AuthError::InvalidSignatureFormat
        })?;

        if normalize(&recovered.to_string()) != normalize(address) {
            tracing::info!(
                address = %normalize(address),
                recovered = %recovered,
                "Signature does not match claimed address"
            );
            return Err(AuthError::SignatureMismatch);
        }

        // A concurrent verification may have spent the nonce since the lookup.
        if !self.nonces.consume_matching(address, claimed_nonce) {
            return Err(AuthError::NonceNotFound);
        }

        tracing::info!(address = %normalize(address), "Wallet ownership verified");
        Ok(())
    }
}
