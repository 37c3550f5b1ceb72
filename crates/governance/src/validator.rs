// Path: crates/governance/src/validator.rs
//! The pre-execution validator: gates a proposed action against a
//! resolved governance profile and trust score.

use agentgov_types::governance::{CheckResult, GovernanceProfile, Proposal, ValidationOutcome};

use crate::config::{GovernanceConfig, StrictnessRow};

const HIGH_PRIVILEGE: &str = "HIGH_PRIVILEGE";
const INFRASTRUCTURE: &str = "INFRASTRUCTURE";
const SENSITIVE_DATA: &str = "SENSITIVE_DATA";

fn check_risk(proposal: &Proposal, row: &StrictnessRow) -> CheckResult {
    if proposal.risk_score > row.risk_tolerance {
        CheckResult {
            check: "risk",
            passed: false,
            detail: Some(format!(
                "riskScore {} exceeds riskTolerance {}",
                proposal.risk_score, row.risk_tolerance
            )),
        }
    } else {
        CheckResult {
            check: "risk",
            passed: true,
            detail: None,
        }
    }
}

fn check_economics(
    proposal: &Proposal,
    profile: &GovernanceProfile,
    row: &StrictnessRow,
) -> CheckResult {
    match proposal.cost {
        None => CheckResult {
            check: "economics",
            passed: true,
            detail: None,
        },
        Some(cost) => {
            let limit = profile.budget.single_transaction * row.safety_margin;
            if cost > limit {
                CheckResult {
                    check: "economics",
                    passed: false,
                    detail: Some(format!("cost {cost} exceeds limit {limit}")),
                }
            } else {
                CheckResult {
                    check: "economics",
                    passed: true,
                    detail: None,
                }
            }
        }
    }
}

fn check_policies(proposal: &Proposal, row: &StrictnessRow) -> CheckResult {
    let intensity = row.policy_intensity;
    let tags = &proposal.policy_tags;
    let has = |tag: &str| tags.iter().any(|t| t == tag);

    let mut failures = Vec::new();
    if intensity > 0.4 && has(HIGH_PRIVILEGE) && proposal.impact_score > 0.7 {
        failures.push(format!(
            "impactScore {} exceeds 0.7 for HIGH_PRIVILEGE proposal",
            proposal.impact_score
        ));
    }
    if intensity > 0.7 && has(INFRASTRUCTURE) {
        failures.push("INFRASTRUCTURE proposals are blocked at this strictness".to_string());
    }
    if intensity > 0.7 && tags.len() > 3 {
        failures.push(format!("policyTags count {} exceeds 3", tags.len()));
    }
    if intensity > 0.9 && has(SENSITIVE_DATA) {
        failures.push("SENSITIVE_DATA proposals are blocked at this strictness".to_string());
    }

    if failures.is_empty() {
        CheckResult {
            check: "policies",
            passed: true,
            detail: None,
        }
    } else {
        CheckResult {
            check: "policies",
            passed: false,
            detail: Some(failures.join("; ")),
        }
    }
}

fn check_consensus(proposal: &Proposal, trust_score: f64, row: &StrictnessRow) -> CheckResult {
    let required = row.consensus_required || proposal.impact_score > 0.8 * trust_score;
    if !required {
        return CheckResult {
            check: "consensus",
            passed: true,
            detail: None,
        };
    }

    let required_confirmations = row
        .min_confirmations
        .max(if proposal.impact_score > 0.7 { 2 } else { 0 });

    let mut failures = Vec::new();
    if proposal.confirmations < required_confirmations {
        failures.push(format!(
            "confirmations {} below required {required_confirmations}",
            proposal.confirmations
        ));
    }
    if row.human_approval && !proposal.human_approved {
        failures.push("human approval is required at this strictness".to_string());
    }

    if failures.is_empty() {
        CheckResult {
            check: "consensus",
            passed: true,
            detail: None,
        }
    } else {
        CheckResult {
            check: "consensus",
            passed: false,
            detail: Some(failures.join("; ")),
        }
    }
}

/// Validates `proposal` against `profile` and `trust_score`, running every
/// check and aggregating every failure into `reason` rather than
/// short-circuiting on the first one.
pub fn validate(
    config: &GovernanceConfig,
    profile: &GovernanceProfile,
    trust_score: f64,
    proposal: &Proposal,
) -> ValidationOutcome {
    let row = config.strictness_row(profile.strictness);

    let results = vec![
        check_risk(proposal, row),
        check_economics(proposal, profile, row),
        check_policies(proposal, row),
        check_consensus(proposal, trust_score, row),
    ];

    let allowed = results.iter().all(|r| r.passed);
    let reason = results
        .iter()
        .filter_map(|r| r.detail.as_deref())
        .collect::<Vec<_>>()
        .join(" | ");

    tracing::info!(allowed, strictness = ?profile.strictness, "validated proposal");
    agentgov_telemetry::global_sink().inc_validation_outcome(allowed);

    ValidationOutcome {
        allowed,
        strictness_level: profile.strictness,
        validation_results: results,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgov_types::governance::{
        AuthorityTier, BudgetLimits, DelegationLimits, DelegationScope, Permissions, Strictness,
    };
    use chrono::{DateTime, Utc};

    fn profile(strictness: Strictness, single_transaction: f64) -> GovernanceProfile {
        GovernanceProfile {
            tier: AuthorityTier::StandardOperational,
            permissions: Permissions::READ,
            budget: BudgetLimits {
                total: 10_000.0,
                daily: 1_000.0,
                single_transaction,
            },
            delegation: DelegationLimits {
                max: 5,
                scope: DelegationScope::DomainSpecific,
                allow_lower_trust: false,
                auto_approve_at_or_above: 0.95,
            },
            strictness,
            applied_at: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            trust_score_snapshot: 0.5,
            context: None,
        }
    }

    fn sample_proposal() -> Proposal {
        Proposal {
            proposal_type: "ECONOMIC".to_string(),
            impact_score: 0.6,
            risk_score: 0.5,
            cost: Some(5000.0),
            policy_tags: vec!["FINANCIAL".to_string(), "INFRASTRUCTURE".to_string()],
            confirmations: 0,
            human_approved: false,
        }
    }

    #[test]
    fn standard_strictness_admits_the_normative_example() {
        let config = GovernanceConfig::default();
        let profile = profile(Strictness::Standard, 10_000.0);
        let outcome = validate(&config, &profile, 0.5, &sample_proposal());
        assert!(outcome.allowed, "{}", outcome.reason);
    }

    #[test]
    fn high_friction_strictness_rejects_the_normative_example() {
        let config = GovernanceConfig::default();
        let profile = profile(Strictness::HighFriction, 100.0);
        let outcome = validate(&config, &profile, 0.5, &sample_proposal());
        assert!(!outcome.allowed);
        assert!(outcome.reason.contains("riskTolerance") || outcome.reason.contains("INFRASTRUCTURE"));
    }

    #[test]
    fn validator_is_monotone_in_strictness() {
        let config = GovernanceConfig::default();
        let levels = [
            Strictness::Lax,
            Strictness::Standard,
            Strictness::Strict,
            Strictness::HighFriction,
            Strictness::MandatoryHumanInTheLoop,
        ];
        let proposal = sample_proposal();
        for window in levels.windows(2) {
            let lenient = profile(window[0], 10_000.0);
            let strict = profile(window[1], 10_000.0);
            let lenient_outcome = validate(&config, &lenient, 0.5, &proposal);
            let strict_outcome = validate(&config, &strict, 0.5, &proposal);
            if !lenient_outcome.allowed {
                assert!(!strict_outcome.allowed);
            }
        }
    }
}
