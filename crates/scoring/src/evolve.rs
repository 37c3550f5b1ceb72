// Path: crates/scoring/src/evolve.rs
//! Reputation evolution: a pure function mapping a performance snapshot,
//! recent action outcomes, and elapsed time to an updated snapshot.

use agentgov_types::identity::PerformanceMetrics;
use chrono::{DateTime, Utc};

const DECAY_RATE_DAILY: f64 = 0.015;
const DECAY_GRACE_PERIOD_HOURS: i64 = 18;
const MIN_METRIC_FLOOR: f64 = 0.15;
const RECENCY_WEIGHT: f64 = 0.65;
const RECOVERY_ACCELERATION: f64 = 0.1;
const IMPACT_VOLATILITY: f64 = 1.2;
const CONSISTENCY_THRESHOLD: f64 = 0.85;
const MAX_RISK_EXPOSURE_FROM_DECAY: f64 = 0.4;

/// A single recent action's outcome, as fed into [`evolve`].
///
/// `cooperation` and `quality` fall back to the per-action defaults the
/// specification assigns when unset: `0.9`/`0.5` for cooperation on
/// success/failure and `0.95`/`0.2` for quality on success/failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionOutcome {
    /// Whether the action succeeded.
    pub success: bool,
    /// Observed cooperation quality, or `None` to use the success-keyed
    /// default.
    pub cooperation: Option<f64>,
    /// Observed output quality, or `None` to use the success-keyed
    /// default.
    pub quality: Option<f64>,
}

impl ActionOutcome {
    fn cooperation_or_default(&self) -> f64 {
        self.cooperation
            .unwrap_or(if self.success { 0.9 } else { 0.5 })
    }

    fn quality_or_default(&self) -> f64 {
        self.quality
            .unwrap_or(if self.success { 0.95 } else { 0.2 })
    }
}

struct ActionAggregate {
    success_rate: f64,
    reliability: f64,
    cooperation: f64,
    avg_quality: f64,
}

fn aggregate_actions(actions: &[ActionOutcome]) -> ActionAggregate {
    let n = actions.len();
    let successes = actions.iter().filter(|a| a.success).count();
    let success_rate = successes as f64 / n as f64;
    let reliability = (n as f64 / 3.0).min(1.0);
    let cooperation =
        actions.iter().map(ActionOutcome::cooperation_or_default).sum::<f64>() / n as f64;
    let avg_quality =
        actions.iter().map(ActionOutcome::quality_or_default).sum::<f64>() / n as f64;
    ActionAggregate {
        success_rate,
        reliability,
        cooperation,
        avg_quality,
    }
}

fn blend(old: f64, new: f64) -> f64 {
    let weight = if new < old {
        (RECENCY_WEIGHT * IMPACT_VOLATILITY).min(0.95)
    } else {
        RECENCY_WEIGHT
    };
    old * (1.0 - weight) + new * weight
}

/// Applies temporal decay and recent-action impact to `metrics`, returning
/// a freshly computed snapshot. `metrics` is never mutated in place.
///
/// With no recent actions and elapsed time under the decay grace period
/// this is the identity function on every decayable metric — only
/// `last_updated` advances.
pub fn evolve(
    metrics: &PerformanceMetrics,
    recent_actions: &[ActionOutcome],
    now: DateTime<Utc>,
) -> PerformanceMetrics {
    let mut next = *metrics;

    let elapsed = now.signed_duration_since(metrics.last_updated);
    if elapsed.num_hours() > DECAY_GRACE_PERIOD_HOURS {
        let days = elapsed.num_seconds() as f64 / 86_400.0;
        let decay_factor = (1.0 - DECAY_RATE_DAILY).powf(days);
        next.reliability = (next.reliability * decay_factor).max(MIN_METRIC_FLOOR);
        next.cooperation_score = (next.cooperation_score * decay_factor).max(MIN_METRIC_FLOOR);
        next.consistency = (next.consistency * decay_factor).max(MIN_METRIC_FLOOR);
        next.task_success_rate = (next.task_success_rate * decay_factor).max(MIN_METRIC_FLOOR);
        next.compliance_history = (next.compliance_history * decay_factor).max(MIN_METRIC_FLOOR);
        next.risk_exposure =
            (next.risk_exposure + 0.005 * days).min(MAX_RISK_EXPOSURE_FROM_DECAY);
    }

    if !recent_actions.is_empty() {
        let aggregate = aggregate_actions(recent_actions);
        next.task_success_rate = blend(next.task_success_rate, aggregate.success_rate);
        next.reliability = blend(next.reliability, aggregate.reliability);
        next.cooperation_score = blend(next.cooperation_score, aggregate.cooperation);
        next.consistency = blend(next.consistency, aggregate.avg_quality);

        if aggregate.avg_quality >= CONSISTENCY_THRESHOLD {
            next.consistency =
                (next.consistency + RECOVERY_ACCELERATION * (aggregate.avg_quality - 0.5))
                    .min(1.0);
            next.compliance_history = (next.compliance_history + 0.02).min(1.0);
            next.risk_exposure = (next.risk_exposure - 0.01).max(0.01);
        } else if aggregate.avg_quality < 0.4 {
            next.consistency = (next.consistency - 0.1).max(0.1);
        }
    }

    next.last_updated = now;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgov_types::identity::Pnl;

    fn metrics_at(last_updated: DateTime<Utc>) -> PerformanceMetrics {
        PerformanceMetrics {
            reliability: 1.0,
            uptime: 1.0,
            consistency: 1.0,
            task_success_rate: 1.0,
            task_complexity_score: 1.0,
            budget_efficiency: 1.0,
            cooperation_score: 1.0,
            information_sharing_score: None,
            compliance_history: 1.0,
            risk_exposure: 0.0,
            policy_violations: 0,
            roi: 0.0,
            pnl: Pnl::default(),
            last_updated,
        }
    }

    #[test]
    fn no_actions_under_grace_period_is_identity_on_decayable_metrics() {
        let t0 = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let t1 = t0 + chrono::Duration::hours(2);
        let metrics = metrics_at(t0);
        let evolved = evolve(&metrics, &[], t1);
        assert_eq!(evolved.reliability, metrics.reliability);
        assert_eq!(evolved.cooperation_score, metrics.cooperation_score);
        assert_eq!(evolved.consistency, metrics.consistency);
        assert_eq!(evolved.task_success_rate, metrics.task_success_rate);
        assert_eq!(evolved.compliance_history, metrics.compliance_history);
        assert_eq!(evolved.last_updated, t1);
    }

    #[test]
    fn ten_days_of_decay_matches_normative_example() {
        let t0 = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let t1 = t0 + chrono::Duration::days(10);
        let metrics = metrics_at(t0);
        let evolved = evolve(&metrics, &[], t1);
        assert!((evolved.reliability - 0.8597).abs() < 1e-3, "{}", evolved.reliability);
        assert!((evolved.risk_exposure - 0.05).abs() < 1e-9);
    }

    #[test]
    fn high_quality_actions_raise_consistency_and_heal_compliance() {
        let t0 = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut metrics = metrics_at(t0);
        metrics.consistency = 0.5;
        metrics.compliance_history = 0.5;
        metrics.risk_exposure = 0.2;
        let actions = vec![
            ActionOutcome {
                success: true,
                cooperation: None,
                quality: Some(0.95),
            };
            3
        ];
        let evolved = evolve(&metrics, &actions, t0);
        assert!(evolved.consistency > metrics.consistency);
        assert!(evolved.compliance_history > metrics.compliance_history);
        assert!(evolved.risk_exposure < metrics.risk_exposure);
    }

    #[test]
    fn low_quality_actions_reduce_consistency() {
        let t0 = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut metrics = metrics_at(t0);
        metrics.consistency = 0.8;
        let actions = vec![
            ActionOutcome {
                success: false,
                cooperation: None,
                quality: Some(0.1),
            };
            3
        ];
        let evolved = evolve(&metrics, &actions, t0);
        assert!(evolved.consistency < metrics.consistency);
    }
}
