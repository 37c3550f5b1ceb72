// Path: crates/crypto/src/lib.rs
//! # Agent Governance Crypto
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! RSA-PSS/SHA-256 signing and verification, SHA-256 hashing, and the
//! canonical JSON serialization the activity ledger hashes over.

/// Local error type for this crate.
pub mod error;

/// SHA-256 hashing and canonical (fixed field order) JSON serialization.
pub mod hash;

/// RSA-PSS/SHA-256 key pair wrappers, signing, and verification.
pub mod sign;

pub use error::CryptoError;
pub use hash::{canonical_json, sha256, sha256_hex};
pub use sign::{KeyPair, PublicKey};
