// Path: crates/ledger/src/config.rs
//! Ledger-level configuration: the genesis entry's expected previous
//! hash and whether an unrecognized agent id is auto-registered on
//! first append, mirroring the governance crate's overridable tables.

use serde::{Deserialize, Serialize};

/// Genesis and identity-auto-registration settings for an
/// [`crate::ledger::ActivityLedger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// The `prevHash` the first entry (`index == 0`) is expected to
    /// carry. `None` reproduces the normative null-genesis chain;
    /// `Some` anchors this ledger onto an externally computed hash
    /// instead, e.g. when migrating entries out of a predecessor ledger.
    pub genesis_prev_hash: Option<String>,
    /// Whether [`crate::ledger::ActivityLedger::add_entry`] auto-registers
    /// an unrecognized agent id on first append. When `false`, appending
    /// under an unknown identity is rejected instead of silently
    /// registering one — a no-op from the caller's perspective, since
    /// the identity would still need to be registered before signatures
    /// from it carry any meaning.
    pub auto_register_unknown_identities: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_prev_hash: None,
            auto_register_unknown_identities: true,
        }
    }
}
