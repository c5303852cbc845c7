// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-identity fixed-window rate limiter.
//!
//! The identity is whatever the caller hands in (normally the first
//! `X-Forwarded-For` entry). It is trusted as given, so a client that can
//! set that header can pick its own bucket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Duration;

use crate::clock::Clock;

/// Default window length (one minute).
pub const DEFAULT_WINDOW: Duration = Duration::milliseconds(60_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RateLimitEntry {
    count: u32,
    /// Unix milliseconds after which the window resets.
    window_end: i64,
}

/// Fixed-window request counter keyed by identity.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Record a request from `identity` and report whether it is allowed.
    ///
    /// A denied request leaves the entry untouched.
    pub fn allow(&self, identity: &str, limit: u32, window: Duration) -> bool {
        let now = self.clock.now_millis();
        let fresh = RateLimitEntry {
            count: 1,
            window_end: now + window.num_milliseconds(),
        };

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = entries.get_mut(identity) else {
            entries.insert(identity.to_string(), fresh);
            return true;
        };

        if now > entry.window_end {
            *entry = fresh;
            return true;
        }

        if entry.count >= limit {
            return false;
        }

        entry.count += 1;
        true
    }

    /// Drop every entry whose window has already ended.
    ///
    /// Returns the number of evicted identities.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.window_end);
        before - entries.len()
    }

    /// Number of tracked identities.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter() -> (Arc<ManualClock>, RateLimiter) {
        let clock = Arc::new(ManualClock::default());
        let limiter = RateLimiter::new(clock.clone());
        (clock, limiter)
    }

    #[test]
    fn allows_limit_then_denies_until_window_elapses() {
        let (clock, limiter) = limiter();

        for i in 0..5 {
            assert!(limiter.allow("10.0.0.1", 5, DEFAULT_WINDOW), "call {i}");
        }
        assert!(!limiter.allow("10.0.0.1", 5, DEFAULT_WINDOW));

        // Exactly at the window end the window is still active.
        clock.advance(DEFAULT_WINDOW);
        assert!(!limiter.allow("10.0.0.1", 5, DEFAULT_WINDOW));

        clock.advance(Duration::milliseconds(1));
        assert!(limiter.allow("10.0.0.1", 5, DEFAULT_WINDOW));
    }

    #[test]
    fn identities_are_independent() {
        let (_clock, limiter) = limiter();

        assert!(limiter.allow("a", 1, DEFAULT_WINDOW));
        assert!(!limiter.allow("a", 1, DEFAULT_WINDOW));
        assert!(limiter.allow("b", 1, DEFAULT_WINDOW));
    }

    #[test]
    fn denied_request_does_not_extend_count() {
        let (clock, limiter) = limiter();

        assert!(limiter.allow("a", 2, DEFAULT_WINDOW));
        assert!(limiter.allow("a", 2, DEFAULT_WINDOW));
        for _ in 0..10 {
            assert!(!limiter.allow("a", 2, DEFAULT_WINDOW));
        }

        clock.advance(DEFAULT_WINDOW + Duration::milliseconds(1));
        assert!(limiter.allow("a", 2, DEFAULT_WINDOW));
        assert!(limiter.allow("a", 2, DEFAULT_WINDOW));
        assert!(!limiter.allow("a", 2, DEFAULT_WINDOW));
    }

    #[test]
    fn purge_drops_only_expired_windows() {
        let (clock, limiter) = limiter();

        limiter.allow("old", 5, DEFAULT_WINDOW);
        clock.advance(Duration::seconds(30));
        limiter.allow("new", 5, DEFAULT_WINDOW);
        clock.advance(Duration::seconds(31));

        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.len(), 1);

        clock.advance(Duration::seconds(60));
        assert_eq!(limiter.purge_expired(), 1);
        assert!(limiter.is_empty());
    }
}
