// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expired Entry Sweeper
//!
//! Background task that evicts expired rate-limit windows and stale nonces
//! so the in-memory tables do not grow for the lifetime of the process.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::nonce::NonceStore;
use super::rate_limit::RateLimiter;

pub struct StoreSweeper {
    limiter: Arc<RateLimiter>,
    nonces: Arc<NonceStore>,
    interval: Duration,
}

impl StoreSweeper {
    pub fn new(limiter: Arc<RateLimiter>, nonces: Arc<NonceStore>, interval: Duration) -> Self {
        Self {
            limiter,
            nonces,
            interval,
        }
    }

    /// Run sweeps until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Store sweeper starting");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Store sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    /// Execute one sweep. Returns `(rate_limit_entries, nonces)` evicted.
    pub fn sweep(&self) -> (usize, usize) {
        let identities = self.limiter.purge_expired();
        let nonces = self.nonces.purge_expired();

        if identities > 0 || nonces > 0 {
            debug!(
                identities,
                nonces,
                remaining_identities = self.limiter.len(),
                remaining_nonces = self.nonces.len(),
                "Evicted expired entries"
            );
        }

        (identities, nonces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::nonce::DEFAULT_NONCE_TTL;
    use crate::auth::rate_limit::DEFAULT_WINDOW;
    use crate::clock::ManualClock;

    fn fixture() -> (Arc<ManualClock>, StoreSweeper) {
        let clock = Arc::new(ManualClock::default());
        let sweeper = StoreSweeper::new(
            Arc::new(RateLimiter::new(clock.clone())),
            Arc::new(NonceStore::new(clock.clone(), DEFAULT_NONCE_TTL)),
            Duration::from_millis(10),
        );
        (clock, sweeper)
    }

    #[test]
    fn sweep_evicts_expired_entries() {
        let (clock, sweeper) = fixture();
        sweeper.limiter.allow("1.1.1.1", 5, DEFAULT_WINDOW);
        sweeper.nonces.issue("0xabc").unwrap();

        assert_eq!(sweeper.sweep(), (0, 0));

        clock.advance(DEFAULT_NONCE_TTL + chrono::Duration::seconds(1));
        assert_eq!(sweeper.sweep(), (1, 1));
        assert!(sweeper.limiter.is_empty());
        assert!(sweeper.nonces.is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let (_clock, sweeper) = fixture();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(sweeper.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper stops promptly")
            .expect("sweeper task did not panic");
    }
}
