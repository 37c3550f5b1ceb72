// Path: crates/types/src/identity.rs
//! The agent identity record: immutable attributes, a performance
//! snapshot, derived trust profile, and version history.
//!
//! `Identity` itself is pure data. Construction and every state
//! transition (`updatePerformance`, `upgrade`, `migrate`) are free
//! functions living in `agentgov-registry`, which is the only crate that
//! needs both this type and `agentgov-scoring` together; keeping them out
//! of this crate avoids a `types -> scoring -> types` dependency cycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::TrustProfile;

/// Profit-and-loss snapshot. `net_profit` is maintained as an invariant:
/// `net_profit = total_revenue - total_expenses`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pnl {
    /// Cumulative revenue attributed to the agent.
    pub total_revenue: f64,
    /// Cumulative expenses attributed to the agent.
    pub total_expenses: f64,
    /// `total_revenue - total_expenses`, recomputed on every update.
    pub net_profit: f64,
}

impl Default for Pnl {
    fn default() -> Self {
        Self {
            total_revenue: 0.0,
            total_expenses: 0.0,
            net_profit: 0.0,
        }
    }
}

impl Pnl {
    /// Returns a copy with `net_profit` recomputed from revenue and expenses.
    pub fn recomputed(mut self) -> Self {
        self.net_profit = self.total_revenue - self.total_expenses;
        self
    }
}

/// The recognized performance metrics, all `[0,1]` unless noted on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Fraction of time the agent is reachable and responsive.
    pub reliability: f64,
    /// Fraction of expected uptime windows actually observed.
    pub uptime: f64,
    /// Stability of behavior across time.
    pub consistency: f64,
    /// Fraction of attempted tasks completed successfully.
    pub task_success_rate: f64,
    /// Average complexity of completed tasks.
    pub task_complexity_score: f64,
    /// Fraction of allotted budget spent efficiently.
    pub budget_efficiency: f64,
    /// Willingness/effectiveness at cooperating with peers.
    pub cooperation_score: f64,
    /// Willingness/effectiveness at sharing information with peers.
    pub information_sharing_score: Option<f64>,
    /// Historical adherence to policy.
    pub compliance_history: f64,
    /// Current risk exposure; `0` is safest.
    pub risk_exposure: f64,
    /// Count of recorded policy violations (non-negative).
    pub policy_violations: u32,
    /// Unbounded real-valued return on investment; normalized by `/100`
    /// then clamped to `[0,1]` at scoring time.
    pub roi: f64,
    /// Revenue/expense/profit snapshot.
    pub pnl: Pnl,
    /// Timestamp of the last update to this snapshot.
    pub last_updated: DateTime<Utc>,
}

impl PerformanceMetrics {
    /// The default snapshot assigned to a freshly registered identity, per
    /// the identity-construction defaults.
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            reliability: 1.0,
            uptime: 1.0,
            consistency: 1.0,
            task_success_rate: 1.0,
            task_complexity_score: 0.0,
            budget_efficiency: 1.0,
            cooperation_score: 1.0,
            information_sharing_score: None,
            compliance_history: 1.0,
            risk_exposure: 0.05,
            policy_violations: 0,
            roi: 0.0,
            pnl: Pnl::default(),
            last_updated: now,
        }
    }
}

/// A single entry in an identity's version history. Appended exactly once
/// per `upgrade`, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistoryEntry {
    /// The `identityVersion` in effect after this entry was recorded.
    pub version: String,
    /// When this transition occurred.
    pub timestamp: DateTime<Utc>,
    /// A short machine-readable tag for the kind of transition
    /// (`IDENTITY_INITIALIZED`, `SCHEMA_MIGRATION`, a caller-supplied reason).
    pub action: String,
    /// A free-form human-readable description of the transition.
    pub details: String,
}

/// The mutable-by-replacement metadata block of an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMetadata {
    /// When the identity was first registered.
    pub creation_timestamp: DateTime<Utc>,
    /// Three-component dotted version string, e.g. `"1.0.3"`.
    pub identity_version: String,
    /// The complete, monotonically growing transition history.
    pub version_history: Arc<Vec<VersionHistoryEntry>>,
}

/// The terminal revocation state of an identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevocationState {
    /// Whether the identity has been revoked.
    pub revoked: bool,
}

/// An agent's persistent, cryptographically rooted identity record.
///
/// Every field group that the data model marks copy-on-write
/// (`metadata`, `performance`, `trust_profile`) is replaced whole on every
/// transition, never mutated in place; `version_history` is wrapped in
/// [`Arc`] so that superseded [`Identity`] values can keep sharing the
/// unchanged historical prefix instead of cloning it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable string fingerprint, `did:agent:<hex>` by default.
    pub id: String,
    /// Opaque PEM-encoded RSA public key.
    pub public_key: String,
    /// Free-form origin tag set at registration.
    pub origin_system: String,
    /// Creation/version metadata.
    pub metadata: IdentityMetadata,
    /// Current performance snapshot.
    pub performance: PerformanceMetrics,
    /// Most recently computed trust scoring result, if any has been
    /// computed yet.
    pub trust_profile: Option<TrustProfile>,
    /// `trust_profile.composite`, cached for convenient access.
    pub trust_score: Option<f64>,
    /// Whether this identity has been revoked.
    pub revoked: bool,
    /// The reason supplied at revocation time, if revoked.
    pub revocation_reason: Option<String>,
    /// When the identity was revoked, if revoked.
    pub revocation_timestamp: Option<DateTime<Utc>>,
    /// The store schema version this record was last written under.
    /// Defaults to `0` so a legacy document missing the key entirely
    /// still deserializes and reaches the schema-version migration.
    #[serde(default)]
    pub schema_version: u32,
}

/// Derives the `did:agent:<hex>` fingerprint for a public key, where
/// `<hex>` is lowercase hex of SHA-256 over the raw public key bytes.
///
/// This is the single source of truth for identity fingerprinting: every
/// call site that needs an agent id from a public key must route through
/// this function rather than re-deriving it inline.
pub fn derive_agent_id(public_key_hash_hex: &str) -> String {
    format!("did:agent:{public_key_hash_hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_recompute_applies_invariant() {
        let pnl = Pnl {
            total_revenue: 100.0,
            total_expenses: 40.0,
            net_profit: 0.0,
        }
        .recomputed();
        assert_eq!(pnl.net_profit, 60.0);
    }

    #[test]
    fn derive_agent_id_formats_as_did() {
        assert_eq!(derive_agent_id("deadbeef"), "did:agent:deadbeef");
    }
}
