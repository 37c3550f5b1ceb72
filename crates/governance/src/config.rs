// Path: crates/governance/src/config.rs
//! Overridable threshold tables for adaptive governance tiering and the
//! pre-execution validator's strictness levels.
//!
//! The defaults reproduce the normative five-tier and five-strictness
//! tables exactly; a host may override them (e.g. to tune thresholds
//! without recompiling) by constructing a [`GovernanceConfig`] from
//! deserialized rows instead of [`GovernanceConfig::default`].

use agentgov_types::governance::{
    AuthorityTier, BudgetLimits, DelegationLimits, DelegationScope, Permissions, Strictness,
};
use serde::{Deserialize, Serialize};

/// A single row of the authority tier table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierRow {
    /// The tier this row describes.
    pub tier: AuthorityTier,
    /// The minimum composite (or context) score this tier applies at.
    pub min_score: f64,
    /// Permissions this tier grants.
    pub permissions: Permissions,
    /// Budget ceilings this tier grants.
    pub budget: BudgetLimits,
    /// Delegation limits this tier grants.
    pub delegation: DelegationLimits,
    /// The validator strictness this tier maps to.
    pub strictness: Strictness,
}

/// A single row of the validator strictness table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrictnessRow {
    /// The strictness level this row describes.
    pub strictness: Strictness,
    /// Maximum `proposal.riskScore` admitted before the risk check fails.
    pub risk_tolerance: f64,
    /// Multiplier applied to `singleTransactionLimit` in the economics check.
    pub safety_margin: f64,
    /// Gates how aggressively the policy check applies its progressive rules.
    pub policy_intensity: f64,
    /// Whether the consensus check is unconditionally required.
    pub consensus_required: bool,
    /// Minimum confirmations required when consensus is engaged.
    pub min_confirmations: u32,
    /// Whether human approval is mandatory regardless of confirmations.
    pub human_approval: bool,
}

/// The complete, overridable set of governance threshold tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Tier rows, expected sorted by descending `min_score`.
    pub tiers: Vec<TierRow>,
    /// Strictness rows.
    pub strictness_levels: Vec<StrictnessRow>,
}

impl GovernanceConfig {
    /// Resolves `score` to its tier row: the highest `min_score` row that
    /// `score` meets or exceeds. Falls back to the lowest-privilege row
    /// when `score` is below every threshold.
    pub fn resolve(&self, score: f64) -> &TierRow {
        self.tiers
            .iter()
            .find(|row| score >= row.min_score)
            .unwrap_or_else(|| {
                self.tiers
                    .last()
                    .expect("GovernanceConfig.tiers must be non-empty")
            })
    }

    /// Looks up a strictness row by level.
    pub fn strictness_row(&self, strictness: Strictness) -> &StrictnessRow {
        self.strictness_levels
            .iter()
            .find(|row| row.strictness == strictness)
            .unwrap_or_else(|| {
                self.strictness_levels
                    .last()
                    .expect("GovernanceConfig.strictness_levels must be non-empty")
            })
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierRow {
                    tier: AuthorityTier::EliteAuthority,
                    min_score: 0.90,
                    permissions: Permissions::READ
                        | Permissions::WRITE
                        | Permissions::EXECUTE
                        | Permissions::COMMIT
                        | Permissions::GOVERN
                        | Permissions::ADMIN
                        | Permissions::SUDO,
                    budget: BudgetLimits {
                        total: 1_000_000.0,
                        daily: 50_000.0,
                        single_transaction: 10_000.0,
                    },
                    delegation: DelegationLimits {
                        max: 50,
                        scope: DelegationScope::Unrestricted,
                        allow_lower_trust: true,
                        auto_approve_at_or_above: 0.85,
                    },
                    strictness: Strictness::Lax,
                },
                TierRow {
                    tier: AuthorityTier::HighTrust,
                    min_score: 0.70,
                    permissions: Permissions::READ
                        | Permissions::WRITE
                        | Permissions::EXECUTE
                        | Permissions::COMMIT
                        | Permissions::GOVERN,
                    budget: BudgetLimits {
                        total: 100_000.0,
                        daily: 10_000.0,
                        single_transaction: 2_500.0,
                    },
                    delegation: DelegationLimits {
                        max: 20,
                        scope: DelegationScope::CrossDomain,
                        allow_lower_trust: true,
                        auto_approve_at_or_above: 0.90,
                    },
                    strictness: Strictness::Standard,
                },
                TierRow {
                    tier: AuthorityTier::StandardOperational,
                    min_score: 0.40,
                    permissions: Permissions::READ | Permissions::WRITE | Permissions::EXECUTE,
                    budget: BudgetLimits {
                        total: 10_000.0,
                        daily: 1_000.0,
                        single_transaction: 500.0,
                    },
                    delegation: DelegationLimits {
                        max: 5,
                        scope: DelegationScope::DomainSpecific,
                        allow_lower_trust: false,
                        auto_approve_at_or_above: 0.95,
                    },
                    strictness: Strictness::Strict,
                },
                TierRow {
                    tier: AuthorityTier::Restricted,
                    min_score: 0.20,
                    permissions: Permissions::READ | Permissions::EXECUTE,
                    budget: BudgetLimits {
                        total: 1_000.0,
                        daily: 100.0,
                        single_transaction: 100.0,
                    },
                    delegation: DelegationLimits {
                        max: 1,
                        scope: DelegationScope::SupervisedOnly,
                        allow_lower_trust: false,
                        auto_approve_at_or_above: 1.0,
                    },
                    strictness: Strictness::HighFriction,
                },
                TierRow {
                    tier: AuthorityTier::Probationary,
                    min_score: f64::NEG_INFINITY,
                    permissions: Permissions::READ,
                    budget: BudgetLimits {
                        total: 0.0,
                        daily: 0.0,
                        single_transaction: 0.0,
                    },
                    delegation: DelegationLimits {
                        max: 0,
                        scope: DelegationScope::None,
                        allow_lower_trust: false,
                        auto_approve_at_or_above: 1.0,
                    },
                    strictness: Strictness::MandatoryHumanInTheLoop,
                },
            ],
            strictness_levels: vec![
                StrictnessRow {
                    strictness: Strictness::Lax,
                    risk_tolerance: 0.9,
                    safety_margin: 1.05,
                    policy_intensity: 0.1,
                    consensus_required: false,
                    min_confirmations: 0,
                    human_approval: false,
                },
                StrictnessRow {
                    strictness: Strictness::Standard,
                    risk_tolerance: 0.6,
                    safety_margin: 1.00,
                    policy_intensity: 0.5,
                    consensus_required: false,
                    min_confirmations: 0,
                    human_approval: false,
                },
                StrictnessRow {
                    strictness: Strictness::Strict,
                    risk_tolerance: 0.3,
                    safety_margin: 0.85,
                    policy_intensity: 0.8,
                    consensus_required: true,
                    min_confirmations: 1,
                    human_approval: false,
                },
                StrictnessRow {
                    strictness: Strictness::HighFriction,
                    risk_tolerance: 0.1,
                    safety_margin: 0.70,
                    policy_intensity: 1.0,
                    consensus_required: true,
                    min_confirmations: 3,
                    human_approval: false,
                },
                StrictnessRow {
                    strictness: Strictness::MandatoryHumanInTheLoop,
                    risk_tolerance: 0.0,
                    safety_margin: 0.50,
                    policy_intensity: 1.0,
                    consensus_required: true,
                    min_confirmations: 5,
                    human_approval: true,
                },
            ],
        }
    }
}
