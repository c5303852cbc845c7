// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-191 personal-message signer recovery.
//!
//! Every wallet client signs with `personal_sign`, so the digest is
//! `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
//! Signatures are 65 bytes (`r || s || v`), hex encoded with an optional
//! `0x` prefix; `v` may be `0/1` or `27/28`.

use alloy::primitives::{Address, Signature};
use thiserror::Error;

/// Length of a serialized `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Reasons a signature cannot be turned into a signer address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature is not valid hex")]
    InvalidHex,
    #[error("signature must be {SIGNATURE_LENGTH} bytes, got {0}")]
    InvalidLength(usize),
    #[error("malformed signature: {0}")]
    Malformed(String),
    #[error("signer recovery failed: {0}")]
    Recovery(String),
}

/// Recover the address that produced `signature` over `message`.
///
/// A well-formed signature always recovers *some* address; whether it is
/// the expected one is for the caller to decide.
pub fn recover_signer(message: &str, signature: &str) -> Result<Address, SignatureError> {
    let bytes = alloy::hex::decode(signature.trim()).map_err(|_| SignatureError::InvalidHex)?;
    if bytes.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::InvalidLength(bytes.len()));
    }

    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| SignatureError::Malformed(e.to_string()))?;

    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| SignatureError::Recovery(e.to_string()))
}

/// Message a wallet signs to prove control of `address` for `nonce`.
pub fn sign_in_message(address: &str, nonce: &str) -> String {
    format!("Sign this message to verify ownership of {address}.\n\nNonce: {nonce}")
}

/// Message a wallet signs to register `address` at `timestamp` (Unix ms).
pub fn registration_message(address: &str, timestamp: i64) -> String {
    format!("Register wallet {address} at timestamp {timestamp}")
}

#[cfg(test)]
pub(crate) mod test_support {
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    pub const ALICE_KEY: &str =
        "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    pub const BOB_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    pub fn signer(key: &str) -> PrivateKeySigner {
        key.parse().expect("valid test key")
    }

    /// Checksummed address of `signer`.
    pub fn address_of(signer: &PrivateKeySigner) -> String {
        signer.address().to_string()
    }

    /// `0x`-prefixed 65-byte personal-message signature.
    pub fn sign(signer: &PrivateKeySigner, message: &str) -> String {
        let signature = signer
            .sign_message_sync(message.as_bytes())
            .expect("signing succeeds");
        alloy::hex::encode_prefixed(signature.as_bytes())
    }
}
