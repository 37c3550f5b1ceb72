// Path: crates/graph/src/analytics.rs
//! Centrality, impact, risk-cluster, and delegation-chain analytics over
//! a built [`TrustGraph`].

use std::collections::{BTreeSet, VecDeque};

use crate::types::{CollaborationTag, EdgeType, TrustGraph};

fn collab_frequency(graph: &TrustGraph, node: &str) -> u64 {
    graph
        .collaboration_counts
        .iter()
        .filter(|(key, _)| key.split("<->").any(|side| side == node))
        .map(|(_, count)| *count)
        .sum()
}

/// `centralityIndex = 1.5*inDegree + outDegree + 2*collabFrequency`,
/// sorted descending; ties break by agent id for determinism.
pub fn central_nodes(graph: &TrustGraph) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = graph
        .nodes
        .iter()
        .map(|(id, node)| {
            let score = 1.5 * node.connections.r#in as f64
                + node.connections.out as f64
                + 2.0 * collab_frequency(graph, id) as f64;
            (id.clone(), score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
    scored
}

fn success_rate(graph: &TrustGraph, node: &str) -> f64 {
    let mut total = 0u64;
    let mut success = 0u64;
    for edge in graph.collaboration_edges_touching(node) {
        total += 1;
        if edge.tag == Some(CollaborationTag::Success) {
            success += 1;
        }
    }
    if total == 0 {
        1.0
    } else {
        success as f64 / total as f64
    }
}

/// `impactScore = 0.1*pnl + 100*successRate + 5*count`, sorted
/// descending; ties break by agent id.
pub fn high_impact_contributors(graph: &TrustGraph) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = graph
        .nodes
        .iter()
        .map(|(id, node)| {
            let score = 0.1 * node.performance.pnl
                + 100.0 * success_rate(graph, id)
                + 5.0 * node.performance.count as f64;
            (id.clone(), score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
    scored
}

/// A connected component of at-risk nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskCluster {
    /// The member agent ids, in BFS discovery order.
    pub members: Vec<String>,
    /// `(1-avgTrust)*size + 2*totalViolations`.
    pub risk_level: f64,
}

fn is_risky(graph: &TrustGraph, id: &str) -> bool {
    let node = &graph.nodes[id];
    node.trust_score.unwrap_or(1.0) < 0.4 || node.performance.violations > 0
}

fn neighbors(graph: &TrustGraph, id: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for edge in graph.edges.iter() {
        if edge.from == id {
            found.insert(edge.to.clone());
        } else if edge.to == id {
            found.insert(edge.from.clone());
        }
    }
    found
}

/// BFS connected components over nodes with `trustScore<0.4 OR
/// violations>0`, restricted to edges between two such nodes.
pub fn risk_clusters(graph: &TrustGraph) -> Vec<RiskCluster> {
    let risky: BTreeSet<String> = graph
        .nodes
        .keys()
        .filter(|id| is_risky(graph, id))
        .cloned()
        .collect();

    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut clusters = Vec::new();

    for seed in &risky {
        if visited.contains(seed) {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = VecDeque::from([seed.clone()]);
        visited.insert(seed.clone());

        while let Some(current) = queue.pop_front() {
            members.push(current.clone());
            for neighbor in neighbors(graph, &current) {
                if risky.contains(&neighbor) && !visited.contains(&neighbor) {
                    visited.insert(neighbor.clone());
                    queue.push_back(neighbor);
                }
            }
        }

        let size = members.len() as f64;
        let avg_trust = members
            .iter()
            .map(|id| graph.nodes[id].trust_score.unwrap_or(1.0))
            .sum::<f64>()
            / size;
        let total_violations: u64 = members
            .iter()
            .map(|id| graph.nodes[id].performance.violations)
            .sum();

        clusters.push(RiskCluster {
            members,
            risk_level: (1.0 - avg_trust) * size + 2.0 * total_violations as f64,
        });
    }

    clusters
}

/// A path of delegation starting from a root with no incoming
/// delegations. A `(LOOP)` marker terminates a path that revisits a
/// node already on it, rather than recursing forever.
pub fn delegation_chains(graph: &TrustGraph) -> Vec<Vec<String>> {
    let seeds: Vec<&String> = graph
        .nodes
        .iter()
        .filter(|(_, node)| node.connections.r#in == 0 && node.connections.out > 0)
        .map(|(id, _)| id)
        .collect();

    let mut chains = Vec::new();
    for seed in seeds {
        let mut path = vec![seed.clone()];
        let mut on_path: BTreeSet<String> = BTreeSet::from([seed.clone()]);
        walk_delegation(graph, seed, &mut path, &mut on_path, &mut chains);
    }
    chains
}

fn walk_delegation(
    graph: &TrustGraph,
    current: &str,
    path: &mut Vec<String>,
    on_path: &mut BTreeSet<String>,
    chains: &mut Vec<Vec<String>>,
) {
    const LOOP_MARKER: &str = "(LOOP)";

    let targets: Vec<&String> = graph
        .edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::Delegation && e.from == current)
        .map(|e| &e.to)
        .collect();

    if targets.is_empty() {
        chains.push(path.clone());
        return;
    }

    for target in targets {
        if on_path.contains(target) {
            let mut looped = path.clone();
            looped.push(LOOP_MARKER.to_string());
            chains.push(looped);
            continue;
        }
        path.push(target.clone());
        on_path.insert(target.clone());
        walk_delegation(graph, target, path, on_path, chains);
        on_path.remove(target);
        path.pop();
    }
}
