// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repositories over file storage.

pub mod registrations;

pub use registrations::{AppendOutcome, RegistrationLedger, RegistrationRecord, EVM_WALLET_TYPE};
