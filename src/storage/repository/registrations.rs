// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration ledger.
//!
//! The ledger is a single JSON array under `<data>/registrations.json`, in
//! insertion order. Every write reads the whole file, modifies it in memory
//! and rewrites it. Writers are serialized by the ledger's own lock, which
//! also makes the duplicate check and the append one critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, StorageResult};

/// Wallet family tag written on every record.
pub const EVM_WALLET_TYPE: &str = "EVM";

/// A completed registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Wallet family (always `EVM`).
    pub wallet_type: String,
    /// Address as supplied by the client, case preserved.
    pub address: String,
    /// Client-supplied registration time, Unix milliseconds.
    pub timestamp: i64,
}

impl RegistrationRecord {
    pub fn evm(address: impl Into<String>, timestamp: i64) -> Self {
        Self {
            wallet_type: EVM_WALLET_TYPE.to_string(),
            address: address.into(),
            timestamp,
        }
    }

    /// Case-insensitive address comparison.
    pub fn is_for(&self, address: &str) -> bool {
        self.address.to_lowercase() == address.to_lowercase()
    }
}

/// Result of [`RegistrationLedger::append_unique`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    Duplicate,
}

/// Durable, deduplicated list of registrations.
pub struct RegistrationLedger {
    storage: Arc<FileStorage>,
    write_lock: Mutex<()>,
}

impl RegistrationLedger {
    pub fn new(storage: Arc<FileStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// All records in insertion order. A missing ledger file is empty.
    pub fn records(&self) -> StorageResult<Vec<RegistrationRecord>> {
        Ok(self
            .storage
            .read_json(self.storage.paths().registrations())?
            .unwrap_or_default())
    }

    /// Whether any record matches `address`, ignoring case.
    pub fn is_registered(&self, address: &str) -> StorageResult<bool> {
        Ok(self.records()?.iter().any(|r| r.is_for(address)))
    }

    /// Append `record` and persist the whole ledger, without a duplicate check.
    pub fn append(&self, record: RegistrationRecord) -> StorageResult<()> {
        let _guard = self.lock();
        let mut records = self.records()?;
        records.push(record);
        self.persist(&records)
    }

    /// Append `record` unless its address is already present.
    ///
    /// The check and the write happen under the same lock, so concurrent
    /// callers for one address produce exactly one record.
    pub fn append_unique(&self, record: RegistrationRecord) -> StorageResult<AppendOutcome> {
        let _guard = self.lock();
        let mut records = self.records()?;
        if records.iter().any(|r| r.is_for(&record.address)) {
            return Ok(AppendOutcome::Duplicate);
        }

        records.push(record);
        self.persist(&records)?;
        Ok(AppendOutcome::Appended)
    }

    fn persist(&self, records: &[RegistrationRecord]) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().registrations(), &records)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
