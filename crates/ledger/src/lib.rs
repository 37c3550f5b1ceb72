// Path: crates/ledger/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Ledger
//!
//! The append-only, hash-chained, per-entry-signed activity ledger:
//! every recorded action is linked to the previous entry's hash and
//! carries its own RSA-PSS/SHA-256 signature, verified either directly
//! against a supplied public key or routed through an
//! [`agentgov_registry::IdentityRegistry`] for replay and revocation
//! checks.

/// Overridable genesis and auto-registration settings.
pub mod config;
/// The ledger itself: append, verify, persist, load.
pub mod ledger;

pub use config::LedgerConfig;
pub use ledger::{ActivityLedger, AddEntryParams};
