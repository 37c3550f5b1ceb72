// Path: crates/scoring/src/score.rs
//! The trust scoring function: performance metrics in, a six-dimension
//! vector plus five context projections and a composite out.

use agentgov_types::identity::PerformanceMetrics;
use agentgov_types::scoring::{ScoringMetadata, TrustContexts, TrustDimensions, TrustProfile};
use chrono::{DateTime, Utc};

const ENGINE_VERSION: &str = "1.0.0";

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Computes the trust profile for `metrics`, optionally comparing against
/// `history` (the prior snapshot) to detect a worsening risk trend.
///
/// `now` is taken as an explicit parameter rather than sampled internally
/// so the function stays a pure, deterministic mapping from its
/// arguments: the same `(metrics, history, now)` always produces bit-for-bit
/// identical output.
pub fn score(
    metrics: &PerformanceMetrics,
    history: Option<&PerformanceMetrics>,
    now: DateTime<Utc>,
) -> TrustProfile {
    let reliability = clamp01(0.6 * metrics.uptime + 0.4 * metrics.consistency);

    let efficiency = clamp01(0.3 * clamp01(metrics.roi / 100.0) + 0.7 * metrics.budget_efficiency);

    let information_sharing = metrics
        .information_sharing_score
        .unwrap_or(metrics.cooperation_score);
    let cooperation = clamp01(0.7 * metrics.cooperation_score + 0.3 * information_sharing);

    let compliance = clamp01(
        0.8 * (1.0 - 0.2 * f64::from(metrics.policy_violations)).max(0.0)
            + 0.2 * metrics.compliance_history,
    );

    let risk_trend_worsened = history
        .map(|prior| metrics.risk_exposure > prior.risk_exposure)
        .unwrap_or(false);
    let risk_safety_scale = if risk_trend_worsened { 0.9 } else { 1.0 };
    let risk_safety = clamp01((1.0 - metrics.risk_exposure) * risk_safety_scale);

    let competence =
        clamp01(0.8 * metrics.task_success_rate + 0.2 * metrics.task_complexity_score);

    let dimensions = TrustDimensions {
        reliability: round4(reliability),
        efficiency: round4(efficiency),
        cooperation: round4(cooperation),
        compliance: round4(compliance),
        risk_safety: round4(risk_safety),
        competence: round4(competence),
    };

    let contexts = TrustContexts {
        financial: round4(clamp01(0.6 * efficiency + 0.3 * risk_safety + 0.1 * compliance)),
        collaborative: round4(clamp01(
            0.7 * cooperation + 0.2 * reliability + 0.1 * competence,
        )),
        compliance: round4(clamp01(
            0.7 * compliance + 0.2 * risk_safety + 0.1 * reliability,
        )),
        technical: round4(clamp01(0.6 * competence + 0.3 * efficiency + 0.1 * reliability)),
        security: round4(clamp01(0.5 * compliance + 0.4 * risk_safety + 0.1 * reliability)),
    };

    let composite = round4(clamp01(
        0.15 * reliability
            + 0.15 * efficiency
            + 0.20 * cooperation
            + 0.20 * compliance
            + 0.15 * risk_safety
            + 0.15 * competence,
    ));

    TrustProfile {
        composite,
        dimensions,
        contexts,
        timestamp: now,
        metadata: ScoringMetadata {
            data_points: if history.is_some() { 2 } else { 1 },
            engine_version: ENGINE_VERSION,
        },
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use agentgov_types::identity::Pnl;
    use proptest::prelude::*;

    fn metrics_strategy(now: DateTime<Utc>) -> impl Strategy<Value = PerformanceMetrics> {
        (
            0.0f64..=1.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0u32..20,
            -50.0f64..200.0,
        )
            .prop_map(
                move |(
                    uptime,
                    consistency,
                    task_success_rate,
                    task_complexity_score,
                    budget_efficiency,
                    cooperation_score,
                    compliance_history,
                    policy_violations,
                    roi,
                )| {
                    PerformanceMetrics {
                        reliability: uptime,
                        uptime,
                        consistency,
                        task_success_rate,
                        task_complexity_score,
                        budget_efficiency,
                        cooperation_score,
                        information_sharing_score: None,
                        compliance_history,
                        risk_exposure: 0.1,
                        policy_violations,
                        roi,
                        pnl: Pnl::default(),
                        last_updated: now,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn composite_and_dimensions_always_bounded(metrics in metrics_strategy(Utc::now())) {
            let now = metrics.last_updated;
            let profile = score(&metrics, None, now);
            let d = profile.dimensions;
            for v in [d.reliability, d.efficiency, d.cooperation, d.compliance, d.risk_safety, d.competence, profile.composite] {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn scoring_is_deterministic_over_random_inputs(metrics in metrics_strategy(Utc::now())) {
            let now = metrics.last_updated;
            let a = score(&metrics, None, now);
            let b = score(&metrics, None, now);
            prop_assert_eq!(a, b);
        }
    }
}
