// Path: crates/graph/src/forecast.rs
//! Predictive synergy forecasting and systemic risk aggregation.

use crate::analytics::{central_nodes, risk_clusters};
use crate::types::{CollaborationTag, TrustGraph};

/// Which action a pairwise synergy forecast recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// `successRate * compatibility > 0.6`.
    PromoteCollaboration,
    /// Otherwise.
    MonitoredCooperation,
}

/// The forecast for a candidate collaboration between two agents.
#[derive(Debug, Clone, PartialEq)]
pub struct SynergyForecast {
    /// Number of times `a` and `b` have collaborated historically.
    pub historical_count: u64,
    /// `SUCCESS` share of their historical collaboration edges.
    pub success_rate: f64,
    /// Average cooperation dimension across both parties' trust profiles.
    pub compatibility: f64,
    /// `0.6*successRate + 0.4*compatibility`.
    pub synergy_probability: f64,
    /// `(avgPnl_a + avgPnl_b) * boost`.
    pub predicted_economic_surplus: f64,
    /// A confidence score that grows with `historical_count`.
    pub confidence: f64,
    /// The recommended next action.
    pub recommendation: Recommendation,
}

fn cooperation_dimension(graph: &TrustGraph, id: &str) -> Option<f64> {
    graph
        .nodes
        .get(id)
        .and_then(|n| n.trust_profile.as_ref())
        .map(|p| p.dimensions.cooperation)
}

fn avg_pnl(graph: &TrustGraph, id: &str) -> f64 {
    graph
        .nodes
        .get(id)
        .map(|n| {
            if n.performance.count == 0 {
                0.0
            } else {
                n.performance.pnl / n.performance.count as f64
            }
        })
        .unwrap_or(0.0)
}

fn pair_historical_success_rate(graph: &TrustGraph, a: &str, b: &str) -> (u64, f64) {
    let count = graph.collaboration_count(a, b);
    if count == 0 {
        return (0, 0.8);
    }
    // The normative historical-edge filter counts only edges whose type
    // is COLLABORATION between the pair, not every edge touching either.
    let edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| {
            e.edge_type == crate::types::EdgeType::Collaboration
                && ((e.from == a && e.to == b) || (e.from == b && e.to == a))
        })
        .collect();
    let total = edges.len() as u64;
    let successes = edges
        .iter()
        .filter(|e| e.tag == Some(CollaborationTag::Success))
        .count() as u64;
    if total == 0 {
        (count, 0.8)
    } else {
        (count, successes as f64 / total as f64)
    }
}

fn boost_for_count(count: u64) -> f64 {
    match count {
        0 => 1.0,
        1..=4 => 1.1,
        _ => 1.25,
    }
}

/// Forecasts the synergy of a candidate collaboration between `a` and
/// `b`, using only their historical collaboration edges (normative
/// `type = COLLABORATION` filter).
pub fn forecast_synergy(graph: &TrustGraph, a: &str, b: &str) -> SynergyForecast {
    let (historical_count, success_rate) = pair_historical_success_rate(graph, a, b);

    let compatibility = match (cooperation_dimension(graph, a), cooperation_dimension(graph, b)) {
        (Some(ca), Some(cb)) => (ca + cb) / 2.0,
        (Some(ca), None) => ca,
        (None, Some(cb)) => cb,
        (None, None) => 0.5,
    };

    let synergy_probability = 0.6 * success_rate + 0.4 * compatibility;
    let boost = boost_for_count(historical_count);
    let predicted_economic_surplus = (avg_pnl(graph, a) + avg_pnl(graph, b)) * boost;
    let confidence = if historical_count == 0 {
        0.4
    } else {
        (0.5 + 0.1 * historical_count as f64).min(0.95)
    };
    let recommendation = if success_rate * compatibility > 0.6 {
        Recommendation::PromoteCollaboration
    } else {
        Recommendation::MonitoredCooperation
    };

    agentgov_telemetry::global_sink().inc_synergy_forecasts();

    SynergyForecast {
        historical_count,
        success_rate,
        compatibility,
        synergy_probability,
        predicted_economic_surplus,
        confidence,
        recommendation,
    }
}

/// The top central nodes that are also structurally vulnerable.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalVulnerability {
    /// The agent id.
    pub agent_id: String,
    /// `centrality/100 * (1-trustScore)`.
    pub vulnerability_score: f64,
}

/// The output of [`forecast_systemic_risk`].
#[derive(Debug, Clone, PartialEq)]
pub struct SystemicRiskReport {
    /// `sum(cluster.riskLevel) / nodeCount`.
    pub global_risk_index: f64,
    /// Top-3 central nodes with `centralityIndex>20`, ranked by
    /// `vulnerabilityScore` descending.
    pub critical_vulnerabilities: Vec<CriticalVulnerability>,
    /// The number of risk clusters found.
    pub risk_cluster_count: usize,
}

/// Aggregates risk clusters and central-node vulnerability into a
/// system-wide risk report.
pub fn forecast_systemic_risk(graph: &TrustGraph) -> SystemicRiskReport {
    let clusters = risk_clusters(graph);
    let node_count = graph.nodes.len().max(1) as f64;
    let global_risk_index = clusters.iter().map(|c| c.risk_level).sum::<f64>() / node_count;

    let mut vulnerable: Vec<CriticalVulnerability> = central_nodes(graph)
        .into_iter()
        .filter(|(_, centrality)| *centrality > 20.0)
        .map(|(id, centrality)| {
            let trust_score = graph.nodes.get(&id).and_then(|n| n.trust_score).unwrap_or(1.0);
            CriticalVulnerability {
                agent_id: id,
                vulnerability_score: (centrality / 100.0) * (1.0 - trust_score),
            }
        })
        .collect();
    vulnerable.sort_by(|a, b| {
        b.vulnerability_score
            .partial_cmp(&a.vulnerability_score)
            .unwrap()
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });
    vulnerable.truncate(3);

    SystemicRiskReport {
        global_risk_index,
        critical_vulnerabilities: vulnerable,
        risk_cluster_count: clusters.len(),
    }
}

/// A candidate pairing with no collaboration history but a high
/// forecast synergy probability.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenSynergy {
    /// The first agent.
    pub a: String,
    /// The second agent.
    pub b: String,
    /// The forecast synergy probability for this pair.
    pub synergy_probability: f64,
}

/// Every pair with zero historical collaboration and
/// `synergyProbability>0.75`, sorted descending, truncated to `top_k`.
pub fn hidden_synergies(graph: &TrustGraph, top_k: usize) -> Vec<HiddenSynergy> {
    let ids: Vec<&String> = graph.nodes.keys().collect();
    let mut found = Vec::new();

    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (a, b) = (ids[i], ids[j]);
            if graph.collaboration_count(a, b) > 0 {
                continue;
            }
            let forecast = forecast_synergy(graph, a, b);
            if forecast.synergy_probability > 0.75 {
                found.push(HiddenSynergy {
                    a: a.clone(),
                    b: b.clone(),
                    synergy_probability: forecast.synergy_probability,
                });
            }
        }
    }

    found.sort_by(|x, y| {
        y.synergy_probability
            .partial_cmp(&x.synergy_probability)
            .unwrap()
            .then_with(|| (x.a.clone(), x.b.clone()).cmp(&(y.a.clone(), y.b.clone())))
    });
    found.truncate(top_k);
    found
}
