// Path: crates/crypto/src/hash.rs
//! SHA-256 hashing and canonical JSON serialization.
//!
//! Canonical serialization never accepts a `HashMap`-backed value: callers
//! must serialize a dedicated, field-ordered struct (see
//! `agentgov_types::ledger::HashPreimage`) so the byte output — and
//! therefore the chain hash built over it — is stable across processes
//! and languages.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Hashes `data` with SHA-256, returning the raw 32-byte digest.
pub fn sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// Hashes `data` with SHA-256, returning the lowercase-hex digest.
pub fn sha256_hex<T: AsRef<[u8]>>(data: T) -> String {
    hex::encode(sha256(data))
}

/// Serializes `value` to its canonical JSON byte representation.
///
/// The caller is responsible for `value`'s type having a fixed,
/// hand-declared field order (struct field declaration order, which
/// `serde_json` preserves); this function does not reorder or sort keys
/// itself, it only forbids the ambiguity of a `HashMap` by requiring a
/// concrete serializable type.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CryptoError> {
    serde_json::to_vec(value).map_err(|e| CryptoError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_deterministic() {
        let a = sha256_hex(b"hello");
        let b = sha256_hex(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn sha256_differs_on_single_byte_change() {
        let a = sha256(b"hello");
        let b = sha256(b"hellp");
        assert_ne!(a, b);
    }
}
