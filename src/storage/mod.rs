// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state lives under a single data directory (`DATA_DIR`):
//!
//! ```text
//! <DATA_DIR>/
//!   registrations.json   # Registration ledger (JSON array, insertion order)
//! ```
//!
//! Nonces and rate-limit counters are process memory only and are not
//! persisted.

pub mod file_store;
pub mod paths;
pub mod repository;

pub use file_store::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{AppendOutcome, RegistrationLedger, RegistrationRecord};
