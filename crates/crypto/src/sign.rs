// Path: crates/crypto/src/sign.rs
//! RSA-PSS/SHA-256 key pairs, signing, and verification.
//!
//! Signatures and digests cross every component boundary as lowercase
//! hex strings and public keys as PEM (SPKI or PKCS#1), matching the
//! on-wire shapes in the activity ledger and identity store.

use pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
use rsa::pss::{Signature as PssSignature, SigningKey, VerifyingKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use signature::{RandomizedSigner, SignatureEncoding, Verifier};

use crate::error::CryptoError;
use crate::hash::sha256_hex;

/// An RSA key pair used to sign ledger entries and identity-bound
/// messages.
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key_pem: String,
}

/// A bare RSA public key used to verify signatures under a PEM an
/// `Identity` already carries.
pub struct PublicKey {
    key: RsaPublicKey,
}

fn parse_private_key_pem(pem: &str) -> Result<RsaPrivateKey, CryptoError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

fn parse_public_key_pem(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

impl KeyPair {
    /// Generates a new random key pair. Key-pair generation is treated as
    /// an external collaborator by the larger system; this constructor
    /// exists for tests and fixtures, not production identity issuance.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    /// Wraps an already-constructed private key, deriving and caching its
    /// SPKI PEM public key.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self, CryptoError> {
        let public_key = RsaPublicKey::from(&private_key);
        let public_key_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self {
            private_key,
            public_key_pem,
        })
    }

    /// Parses a PEM-encoded (PKCS#8 or PKCS#1) RSA private key.
    pub fn from_private_key_pem(pem: &str) -> Result<Self, CryptoError> {
        Self::from_private_key(parse_private_key_pem(pem)?)
    }

    /// The SPKI PEM encoding of this key pair's public key, suitable for
    /// use as `Identity::public_key` or `LedgerEntry::public_key`.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// The `did:agent:<hex>` fingerprint of this key pair's public key.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.public_key_pem.as_bytes())
    }

    /// The PKCS#8 PEM encoding of this key pair's private key, for
    /// callers that sign out-of-process (e.g. the facade crate accepting
    /// a caller-supplied signing key) rather than through [`Self::sign`].
    pub fn private_key_pem(&self) -> Result<String, CryptoError> {
        self.private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }

    /// Signs `message` with RSA-PSS/SHA-256, returning a lowercase hex
    /// signature.
    pub fn sign(&self, message: &[u8]) -> Result<String, CryptoError> {
        let signing_key = SigningKey::<Sha256>::new(self.private_key.clone());
        let signature = signing_key.try_sign_with_rng(&mut OsRng, message);
        let signature =
            signature.map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(hex::encode(signature.to_bytes()))
    }
}

impl PublicKey {
    /// Parses a PEM-encoded (SPKI or PKCS#1) RSA public key.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            key: parse_public_key_pem(pem)?,
        })
    }

    /// The `did:agent:<hex>` fingerprint of this key, derived from its PEM
    /// encoding as it was supplied, matching `KeyPair::fingerprint`'s
    /// derivation for the same key material.
    pub fn fingerprint_of_pem(pem: &str) -> String {
        sha256_hex(pem.as_bytes())
    }

    /// Verifies an RSA-PSS/SHA-256 signature (lowercase hex) over
    /// `message`.
    pub fn verify(&self, message: &[u8], signature_hex: &str) -> Result<(), CryptoError> {
        let signature_bytes =
            hex::decode(signature_hex).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        let signature = PssSignature::try_from(signature_bytes.as_slice())
            .map_err(|_| CryptoError::InvalidSignature)?;
        let verifying_key = VerifyingKey::<Sha256>::new(self.key.clone());
        verifying_key
            .verify(message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_keypair() -> KeyPair {
        KeyPair::generate(2048).expect("key generation should succeed in tests")
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let keypair = fixture_keypair();
        let signature = keypair.sign(b"hello agent").expect("sign");
        let public_key =
            PublicKey::from_pem(keypair.public_key_pem()).expect("parse public key");
        assert!(public_key.verify(b"hello agent", &signature).is_ok());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let keypair = fixture_keypair();
        let signature = keypair.sign(b"hello agent").expect("sign");
        let public_key =
            PublicKey::from_pem(keypair.public_key_pem()).expect("parse public key");
        assert!(public_key.verify(b"goodbye agent", &signature).is_err());
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let keypair = fixture_keypair();
        let mut signature = keypair.sign(b"hello agent").expect("sign");
        let last = signature.pop().unwrap_or('0');
        let flipped = if last == '0' { '1' } else { '0' };
        signature.push(flipped);
        let public_key =
            PublicKey::from_pem(keypair.public_key_pem()).expect("parse public key");
        assert!(public_key.verify(b"hello agent", &signature).is_err());
    }

    #[test]
    fn fingerprint_is_derived_from_public_key_pem() {
        let keypair = fixture_keypair();
        assert_eq!(
            keypair.fingerprint(),
            PublicKey::fingerprint_of_pem(keypair.public_key_pem())
        );
    }
}
