// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{NonceStore, RateLimiter, RegistrationService, StoreSweeper, VerificationService};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::storage::{FileStorage, RegistrationLedger, StoragePaths, StorageResult};

/// Shared handles for request handlers.
///
/// One rate limiter is shared by all endpoints; each operation applies its
/// own limit against the caller's single counter.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<FileStorage>,
    pub limiter: Arc<RateLimiter>,
    pub nonces: Arc<NonceStore>,
    pub verification: Arc<VerificationService>,
    pub registration: Arc<RegistrationService>,
}

impl AppState {
    /// Initialize storage and wire the services.
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> StorageResult<Self> {
        let mut storage = FileStorage::new(StoragePaths::new(&config.data_dir));
        storage.initialize()?;
        let storage = Arc::new(storage);

        let limiter = Arc::new(RateLimiter::new(clock.clone()));
        let nonces = Arc::new(NonceStore::new(clock, config.nonce_ttl));
        let ledger = Arc::new(RegistrationLedger::new(storage.clone()));

        let verification = Arc::new(VerificationService::new(
            limiter.clone(),
            nonces.clone(),
            config.rate_limits,
        ));
        let registration = Arc::new(RegistrationService::new(
            limiter.clone(),
            ledger,
            config.rate_limits,
        ));

        Ok(Self {
            config: Arc::new(config),
            storage,
            limiter,
            nonces,
            verification,
            registration,
        })
    }

    /// Background sweeper over this state's in-memory stores.
    pub fn sweeper(&self) -> StoreSweeper {
        StoreSweeper::new(
            self.limiter.clone(),
            self.nonces.clone(),
            self.config.sweep_interval,
        )
    }
}
