// Path: crates/types/src/error.rs
//! Error types shared across the agent governance substrate.
//!
//! Every rejected operation carries both a machine-readable reason code
//! (via [`ErrorCode`]) and a human-readable description (via `Display`,
//! derived by `thiserror`), as required of the system's user-visible
//! behavior.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an
/// error variant, independent of the (potentially parameterized)
/// human-readable message.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors surfaced by identity registration, lookup, revocation, and
/// signed-action validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// A required field (`publicKey` or `originSystem`) was absent.
    #[error("missing required field: {0}")]
    MissingRequired(&'static str),
    /// The public key is already bound to a different origin system and
    /// `force` was not set.
    #[error("public key is already bound to a different origin system")]
    OriginConflict,
    /// No identity could be resolved for the supplied id or public key.
    #[error("identity not found")]
    IdentityNotFound,
    /// The resolved identity has been revoked.
    #[error("identity has been revoked")]
    IdentityRevoked,
    /// The supplied origin system does not match the registered identity.
    #[error("origin system does not match the registered identity")]
    OriginMismatch,
    /// The supplied timestamp could not be parsed as ISO-8601.
    #[error("timestamp could not be parsed: {0}")]
    InvalidTimestamp(String),
    /// The supplied timestamp is not strictly greater than the identity's
    /// last accepted action timestamp.
    #[error("timestamp is not strictly greater than the last accepted action")]
    ReplayDetected,
    /// The RSA-PSS/SHA-256 signature did not verify under the stored
    /// public key.
    #[error("signature verification failed")]
    InvalidSignature,
}

impl ErrorCode for IdentityError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired(_) => "MISSING_REQUIRED",
            Self::OriginConflict => "ORIGIN_CONFLICT",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::IdentityRevoked => "IDENTITY_REVOKED",
            Self::OriginMismatch => "ORIGIN_MISMATCH",
            Self::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            Self::ReplayDetected => "REPLAY_DETECTED",
            Self::InvalidSignature => "INVALID_SIGNATURE",
        }
    }
}

/// Errors surfaced by the append-only activity ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A required field (`agentId` or `actionType`) was absent.
    #[error("missing required field: {0}")]
    MissingRequired(&'static str),
    /// The identity-level check that gates appending failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// The recomputed hash over an entry's fields does not match its
    /// stored hash.
    #[error("recomputed hash does not match the stored hash at index {0}")]
    HashMismatch(u64),
    /// `entries[i].prevHash` does not equal `entries[i-1].hash`.
    #[error("prevHash linkage is broken at index {0}")]
    ChainLinkBroken(u64),
    /// The genesis entry (index 0) does not have a `null` `prevHash`.
    #[error("genesis entry must have a null prevHash")]
    GenesisPrevHashNotNull,
    /// A stored signature does not verify under the entry's public key at
    /// the given index.
    #[error("signature is invalid at index {0}")]
    InvalidSignature(u64),
    /// An attempt was made to mutate a ledger entry after it was frozen
    /// and appended. This is a programmer error, not an expected failure.
    #[error("attempted to mutate a frozen ledger entry")]
    FrozenEntryMutation,
    /// A file I/O operation failed during persistence.
    #[error("ledger I/O error: {0}")]
    Io(String),
    /// The ledger file could not be parsed as the expected JSON shape.
    #[error("ledger serialization error: {0}")]
    Serialization(String),
}

impl ErrorCode for LedgerError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired(_) => "MISSING_REQUIRED",
            Self::Identity(inner) => inner.code(),
            Self::HashMismatch(_) => "HASH_MISMATCH",
            Self::ChainLinkBroken(_) => "CHAIN_LINK_BROKEN",
            Self::GenesisPrevHashNotNull => "GENESIS_PREVHASH_NOT_NULL",
            Self::InvalidSignature(_) => "INVALID_SIGNATURE",
            Self::FrozenEntryMutation => "FROZEN_ENTRY_MUTATION",
            Self::Io(_) => "LEDGER_IO_ERROR",
            Self::Serialization(_) => "LEDGER_SERIALIZATION_ERROR",
        }
    }
}

/// Errors surfaced by governance tier/strictness configuration lookups.
/// These are programmer/configuration errors (an unknown context or
/// strictness name), distinct from the data-carrying, non-exceptional
/// rejections a [`crate::governance::ValidationOutcome`] represents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// A context projection name was requested that is not one of the
    /// five named contexts.
    #[error("unknown context projection: {0}")]
    UnknownContext(String),
    /// A strictness level name was requested that is not one of the five
    /// named strictness levels.
    #[error("unknown strictness level: {0}")]
    UnknownStrictness(String),
}

impl ErrorCode for GovernanceError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownContext(_) => "UNKNOWN_CONTEXT",
            Self::UnknownStrictness(_) => "UNKNOWN_STRICTNESS",
        }
    }
}
