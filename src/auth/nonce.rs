// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time challenge nonces keyed by wallet address.
//!
//! At most one nonce is live per address: issuing again overwrites the
//! previous challenge. Entries are removed on successful verification or
//! once they outlive the configured TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use crate::clock::Clock;
use crate::error::AuthError;

/// Entropy per nonce, in bytes (hex-encoded to 32 characters).
pub const NONCE_BYTES: usize = 16;

/// Default lifetime of an unconsumed nonce.
pub const DEFAULT_NONCE_TTL: Duration = Duration::minutes(5);

/// Canonical form used for every address key and comparison.
pub fn normalize(address: &str) -> String {
    address.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NonceEntry {
    value: String,
    issued_at: DateTime<Utc>,
}

/// In-memory nonce table.
pub struct NonceStore {
    entries: Mutex<HashMap<String, NonceEntry>>,
    rng: SystemRandom,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl NonceStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            rng: SystemRandom::new(),
            clock,
            ttl,
        }
    }

    /// Generate a fresh nonce for `address`, replacing any outstanding one.
    pub fn issue(&self, address: &str) -> Result<String, AuthError> {
        let mut bytes = [0u8; NONCE_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AuthError::InternalError("system randomness unavailable".into()))?;
        let value = alloy::hex::encode(bytes);

        let entry = NonceEntry {
            value: value.clone(),
            issued_at: self.clock.now(),
        };
        self.lock().insert(normalize(address), entry);
        Ok(value)
    }

    /// Read the live nonce for `address` without consuming it.
    pub fn peek(&self, address: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let key = normalize(address);
        let entry = entries.get(&key)?;
        if self.is_live(entry, now) {
            return Some(entry.value.clone());
        }

        entries.remove(&key);
        None
    }

    /// Remove and return the live nonce for `address`.
    pub fn consume(&self, address: &str) -> Option<String> {
        let now = self.clock.now();
        let entry = self.lock().remove(&normalize(address))?;
        self.is_live(&entry, now).then_some(entry.value)
    }

    /// Remove the nonce for `address` only if it is live and equals `expected`.
    ///
    /// Returns whether a nonce was consumed. Two callers racing with the
    /// same nonce cannot both succeed.
    pub fn consume_matching(&self, address: &str, expected: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.lock();
        let key = normalize(address);
        let matches = entries
            .get(&key)
            .is_some_and(|entry| entry.value == expected && self.is_live(entry, now));
        if matches {
            entries.remove(&key);
        }
        matches
    }

    /// Drop every nonce older than the TTL. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        before - entries.len()
    }

    /// Number of outstanding nonces, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, entry: &NonceEntry, now: DateTime<Utc>) -> bool {
        now - entry.issued_at <= self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, NonceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
