// Path: crates/crypto/src/error.rs
//! Local error type for the `agentgov-crypto` crate.

use agentgov_types::error::ErrorCode;
use thiserror::Error;

/// Errors raised by key parsing, signing, verification, and hashing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A PEM-encoded key could not be parsed as SPKI or PKCS#1.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    /// Signing failed (e.g. a malformed private key).
    #[error("signing failed: {0}")]
    SigningFailed(String),
    /// Signature verification failed, either because the signature is
    /// malformed or because it does not match under the given key.
    #[error("signature verification failed")]
    InvalidSignature,
    /// A hex-encoded value (signature, digest) could not be decoded.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),
    /// A value intended to be serialized for hashing could not be.
    #[error("canonical serialization failed: {0}")]
    Serialization(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::SigningFailed(_) => "SIGNING_FAILED",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidHex(_) => "INVALID_HEX",
            Self::Serialization(_) => "CRYPTO_SERIALIZATION_ERROR",
        }
    }
}
