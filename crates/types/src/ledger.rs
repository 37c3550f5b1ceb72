// Path: crates/types/src/ledger.rs
//! The append-only, hash-chained, per-entry-signed activity ledger entry
//! shape.
//!
//! This type is intentionally "dumb": it carries no behavior, so nothing
//! in this crate can accidentally expose a mutation path. Construction,
//! hashing, signing, chain verification, and persistence all live in
//! `agentgov-ledger`, whose public API never hands out a `&mut
//! LedgerEntry`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single frozen entry in the activity ledger.
///
/// Field order matches the canonical hashing preimage
/// `{index, timestamp, agentId, actionType, details, prevHash}` plus the
/// two fields (`hash`, `signature`, `publicKey`) appended once the entry
/// is sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Zero-based ordinal; equals insertion order.
    pub index: u64,
    /// When this entry was appended.
    pub timestamp: DateTime<Utc>,
    /// The identity that performed the action.
    pub agent_id: String,
    /// The recognized or pass-through action type.
    pub action_type: String,
    /// Opaque, action-type-specific structured payload.
    pub details: Value,
    /// SHA-256 hash of the previous entry; `None` at index 0.
    pub prev_hash: Option<String>,
    /// SHA-256 over the canonical serialization of this entry's
    /// hash-relevant fields.
    pub hash: String,
    /// RSA-PSS/SHA-256 signature over `hash`, lowercase hex.
    pub signature: String,
    /// The PEM public key `signature` verifies under.
    pub public_key: String,
}

/// The on-disk shape of a persisted ledger: `{createdAt, entries}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerFile {
    /// When this ledger was first created.
    pub created_at: DateTime<Utc>,
    /// The complete, in-order sequence of entries.
    pub entries: Vec<LedgerEntry>,
}

/// The exact field set hashed to produce [`LedgerEntry::hash`], serialized
/// with a fixed field order so the chain is stable across processes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashPreimage<'a> {
    /// See [`LedgerEntry::index`].
    pub index: u64,
    /// See [`LedgerEntry::timestamp`].
    pub timestamp: DateTime<Utc>,
    /// See [`LedgerEntry::agent_id`].
    pub agent_id: &'a str,
    /// See [`LedgerEntry::action_type`].
    pub action_type: &'a str,
    /// See [`LedgerEntry::details`].
    pub details: &'a Value,
    /// See [`LedgerEntry::prev_hash`].
    pub prev_hash: &'a Option<String>,
}

/// The outcome of [`crate::ledger`]-level chain verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    /// Whether the entire chain verified successfully.
    pub valid: bool,
    /// The index of the first failing entry, if any.
    pub index: Option<u64>,
    /// A stable machine-readable reason code for the failure, if any.
    pub reason: Option<String>,
}
