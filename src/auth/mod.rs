// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Ownership Module
//!
//! Challenge/response proof that a caller controls an EVM keypair.
//!
//! ## Auth Flow
//!
//! 1. Client requests a nonce for its address
//! 2. Client signs a message embedding the nonce (`personal_sign`)
//! 3. Server:
//!    - rate-limits the caller identity
//!    - checks the claimed nonce against the stored one
//!    - recovers the signer (EIP-191) and compares it with the address
//!    - consumes the nonce so the signature cannot be replayed
//! 4. Client optionally signs a separate registration message, which is
//!    recorded once per address in the registration ledger
//!
//! ## Security
//!
//! - Nonces carry 128 bits of entropy from the system CSPRNG
//! - Nonces expire after a TTL and are single use
//! - The rate-limit identity (`X-Forwarded-For`) is trusted as given

pub mod nonce;
pub mod rate_limit;
pub mod registration;
pub mod signature;
pub mod sweeper;
pub mod verification;

pub use nonce::NonceStore;
pub use rate_limit::RateLimiter;
pub use registration::RegistrationService;
pub use signature::{recover_signer, SignatureError};
pub use sweeper::StoreSweeper;
pub use verification::VerificationService;
