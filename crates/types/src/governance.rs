// Path: crates/types/src/governance.rs
//! Adaptive governance tiers and pre-execution validator types.
//!
//! The normative threshold tables (`AuthorityTier` ceilings, `Strictness`
//! tolerances) are implemented as pure functions in `agentgov-governance`;
//! this module only defines the data shapes they produce and consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringContext;

bitflags::bitflags! {
    /// The action permissions a governance tier grants.
    ///
    /// `Serialize`/`Deserialize` are provided by `bitflags`'s own `serde`
    /// feature, which hooks into this derive to supply the impls for
    /// generated flag types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct Permissions: u8 {
        /// Read access.
        const READ = 0b0000_0001;
        /// Write access.
        const WRITE = 0b0000_0010;
        /// Execute access.
        const EXECUTE = 0b0000_0100;
        /// Ability to commit state changes.
        const COMMIT = 0b0000_1000;
        /// Ability to participate in governance decisions.
        const GOVERN = 0b0001_0000;
        /// Administrative access.
        const ADMIN = 0b0010_0000;
        /// Unrestricted super-user access.
        const SUDO = 0b0100_0000;
    }
}

/// The five discrete authority levels a composite or context score maps
/// to, ordered from least to most privileged so that `a < b` implies `a`
/// is strictly less privileged than `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorityTier {
    /// Minimum trust; read-only, no budget, human-in-the-loop validation.
    Probationary,
    /// Limited trust; read and execute, small budgets.
    Restricted,
    /// Baseline operational trust.
    StandardOperational,
    /// Elevated trust with commit and governance rights.
    HighTrust,
    /// Maximum trust with unrestricted delegation and sudo.
    EliteAuthority,
}

/// How broadly a tier's authority may be delegated to other agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelegationScope {
    /// Delegation is not permitted.
    None,
    /// Delegation only to agents under direct supervision.
    SupervisedOnly,
    /// Delegation within a single operational domain.
    DomainSpecific,
    /// Delegation across operational domains.
    CrossDomain,
    /// Delegation without scope restriction.
    Unrestricted,
}

/// The named validator configuration levels, from most to least permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strictness {
    /// Highest risk tolerance, widest safety margin, no consensus.
    Lax,
    /// Default operational strictness.
    Standard,
    /// Requires consensus and at least one confirmation.
    Strict,
    /// Requires consensus and at least three confirmations.
    HighFriction,
    /// Requires consensus, five confirmations, and human approval.
    MandatoryHumanInTheLoop,
}

/// Spending ceilings attached to a governance tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLimits {
    /// Total budget ceiling.
    pub total: f64,
    /// Maximum spend per day.
    pub daily: f64,
    /// Maximum spend in a single transaction.
    pub single_transaction: f64,
}

/// Delegation limits attached to a governance tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationLimits {
    /// Maximum number of simultaneous delegations.
    pub max: u32,
    /// The breadth of scope delegation may span.
    pub scope: DelegationScope,
    /// Whether this tier may delegate to a lower-trust agent.
    pub allow_lower_trust: bool,
    /// The trust score above which a delegation is auto-approved.
    pub auto_approve_at_or_above: f64,
}

/// A stamped, deep-copied governance profile for a specific score
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceProfile {
    /// The resolved authority tier.
    pub tier: AuthorityTier,
    /// Permissions granted by this tier.
    pub permissions: Permissions,
    /// Budget ceilings granted by this tier.
    pub budget: BudgetLimits,
    /// Delegation limits granted by this tier.
    pub delegation: DelegationLimits,
    /// The validator strictness this tier maps to.
    pub strictness: Strictness,
    /// When this profile was computed.
    pub applied_at: DateTime<Utc>,
    /// The trust score this profile was computed from — either the
    /// composite or, when `context` is set, that context's projection.
    pub trust_score_snapshot: f64,
    /// The named context projection `trust_score_snapshot` was drawn
    /// from, or `None` when it is the raw composite score.
    pub context: Option<ScoringContext>,
}

/// A proposed action submitted to the pre-execution validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// The kind of action being proposed.
    pub proposal_type: String,
    /// Estimated impact of the action, in `[0,1]`.
    pub impact_score: f64,
    /// Estimated risk of the action, in `[0,1]`.
    pub risk_score: f64,
    /// Monetary cost of the action, if any.
    pub cost: Option<f64>,
    /// Policy tags attached to the action.
    pub policy_tags: Vec<String>,
    /// Confirmations already collected for this proposal.
    pub confirmations: u32,
    /// Whether a human has approved this proposal.
    pub human_approved: bool,
}

/// The outcome of a single named check within [`ValidationOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// The name of the check (`risk`, `economics`, `policies`, `consensus`).
    pub check: &'static str,
    /// Whether the check passed.
    pub passed: bool,
    /// A human-readable explanation, populated when the check fails.
    pub detail: Option<String>,
}

/// The result of running the pre-execution validator against a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the proposal is admitted.
    pub allowed: bool,
    /// The strictness level the proposal was evaluated under.
    pub strictness_level: Strictness,
    /// Per-check results, in evaluation order.
    pub validation_results: Vec<CheckResult>,
    /// Every failed sub-check's detail, concatenated; empty when admitted.
    pub reason: String,
}
