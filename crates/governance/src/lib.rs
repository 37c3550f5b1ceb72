// Path: crates/governance/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Tiering and Validation
//!
//! Two pure, closed-form mappings over a trust score: [`governance_profile`]
//! resolves a score to a discrete authority tier with its permissions,
//! budget, delegation limits, and validator strictness; [`validate`] gates
//! a proposed action against that profile.

/// Overridable threshold tables for tiering and validation.
pub mod config;
/// The pre-execution validator.
pub mod validator;

use agentgov_types::error::GovernanceError;
use agentgov_types::governance::{AuthorityTier, GovernanceProfile};
use agentgov_types::scoring::ScoringContext;
use chrono::{DateTime, Utc};
use std::str::FromStr;

pub use config::{GovernanceConfig, TierRow};
pub use validator::validate;

/// Resolves `score` to a [`GovernanceProfile`] using `config`'s tier
/// table (defaulting to the normative five-tier ladder), stamping the
/// result with `now` and `score`.
///
/// `score` is either a trust profile's composite or, when `context` names
/// one of the five [`ScoringContext`] projections, that projection's value
/// — the caller (typically [`agentgov::AgentGovernance`](../agentgov/index.html))
/// resolves which one against the identity's stored trust profile before
/// calling this function. `context` is still validated here and stamped
/// onto the returned profile, so an unrecognized name is rejected even if
/// a caller forgets to resolve it first.
///
/// Tiers are monotone in `score`: a higher score never resolves to a
/// strictly less privileged tier, since [`GovernanceConfig`] rows are kept
/// sorted by descending minimum composite and the first matching row wins.
pub fn governance_profile(
    config: &GovernanceConfig,
    score: f64,
    context: Option<&str>,
    now: DateTime<Utc>,
) -> Result<GovernanceProfile, GovernanceError> {
    let context = context.map(ScoringContext::from_str).transpose()?;
    let row = config.resolve(score);
    let profile = GovernanceProfile {
        tier: row.tier,
        permissions: row.permissions,
        budget: row.budget,
        delegation: row.delegation,
        strictness: row.strictness,
        applied_at: now,
        trust_score_snapshot: score,
        context,
    };
    tracing::info!(
        tier = ?profile.tier,
        score,
        context = ?profile.context,
        "resolved governance profile"
    );
    agentgov_telemetry::global_sink().inc_tier_assigned(tier_label(profile.tier));
    Ok(profile)
}

fn tier_label(tier: AuthorityTier) -> &'static str {
    match tier {
        AuthorityTier::Probationary => "PROBATIONARY",
        AuthorityTier::Restricted => "RESTRICTED",
        AuthorityTier::StandardOperational => "STANDARD_OPERATIONAL",
        AuthorityTier::HighTrust => "HIGH_TRUST",
        AuthorityTier::EliteAuthority => "ELITE_AUTHORITY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn near_perfect_score_reaches_elite_authority() {
        let profile = governance_profile(&GovernanceConfig::default(), 0.99, None, now()).unwrap();
        assert_eq!(profile.tier, AuthorityTier::EliteAuthority);
        assert_eq!(profile.context, None);
    }

    #[test]
    fn zero_score_is_probationary() {
        let profile = governance_profile(&GovernanceConfig::default(), 0.0, None, now()).unwrap();
        assert_eq!(profile.tier, AuthorityTier::Probationary);
    }

    #[test]
    fn tiering_is_monotone_in_composite_score() {
        let config = GovernanceConfig::default();
        let scores = [0.0, 0.1, 0.2, 0.25, 0.4, 0.55, 0.7, 0.85, 0.9, 1.0];
        for window in scores.windows(2) {
            let lower = governance_profile(&config, window[0], None, now()).unwrap();
            let higher = governance_profile(&config, window[1], None, now()).unwrap();
            assert!(lower.tier <= higher.tier);
            assert!(lower.budget.total <= higher.budget.total);
            assert!(higher.permissions.contains(lower.permissions));
        }
    }

    #[test]
    fn named_context_is_stamped_onto_the_profile() {
        let profile =
            governance_profile(&GovernanceConfig::default(), 0.8, Some("financial"), now())
                .unwrap();
        assert_eq!(profile.context, Some(ScoringContext::Financial));
    }

    #[test]
    fn unknown_context_name_is_rejected() {
        let err = governance_profile(&GovernanceConfig::default(), 0.8, Some("bogus"), now())
            .unwrap_err();
        assert_eq!(err, GovernanceError::UnknownContext("bogus".to_string()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    proptest! {
        #[test]
        fn tiering_is_monotone_over_arbitrary_score_pairs(lower in 0.0f64..=1.0, delta in 0.0f64..=1.0) {
            let config = GovernanceConfig::default();
            let higher = (lower + delta).min(1.0);
            let lower_profile = governance_profile(&config, lower, None, now()).unwrap();
            let higher_profile = governance_profile(&config, higher, None, now()).unwrap();
            prop_assert!(lower_profile.tier <= higher_profile.tier);
            prop_assert!(lower_profile.budget.total <= higher_profile.budget.total);
            prop_assert!(higher_profile.permissions.contains(lower_profile.permissions));
        }

        #[test]
        fn resolved_tier_score_snapshot_matches_input(score in 0.0f64..=1.0) {
            let profile = governance_profile(&GovernanceConfig::default(), score, None, now()).unwrap();
            prop_assert_eq!(profile.trust_score_snapshot, score);
        }
    }
}
