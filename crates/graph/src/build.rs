// Path: crates/graph/src/build.rs
//! Incremental and full-rebuild graph construction from ledger entries.

use agentgov_types::ledger::LedgerEntry;
use agentgov_types::scoring::TrustProfile;

use crate::types::{collaboration_key, CollaborationTag, Edge, EdgeType, NodeAggregate, TrustGraph};

/// Looks up an agent's current trust snapshot. The graph crate never
/// depends on `agentgov-registry` directly, so callers (typically the
/// facade crate) supply this closure over whatever identity store they
/// hold.
pub trait TrustLookup {
    /// Returns `(compositeScore, trustProfile)` for `agent_id`, or
    /// `(None, None)` if the agent is unknown.
    fn lookup(&self, agent_id: &str) -> (Option<f64>, Option<TrustProfile>);
}

impl<F> TrustLookup for F
where
    F: Fn(&str) -> (Option<f64>, Option<TrustProfile>),
{
    fn lookup(&self, agent_id: &str) -> (Option<f64>, Option<TrustProfile>) {
        self(agent_id)
    }
}

fn ensure_node<'a>(
    graph: &'a mut TrustGraph,
    agent_id: &str,
    trust_lookup: &dyn TrustLookup,
) -> &'a mut NodeAggregate {
    if !graph.nodes.contains_key(agent_id) {
        let (trust_score, trust_profile) = trust_lookup.lookup(agent_id);
        graph.nodes.insert(
            agent_id.to_string(),
            NodeAggregate {
                trust_score,
                trust_profile,
                ..Default::default()
            },
        );
    }
    graph.nodes.get_mut(agent_id).expect("just inserted")
}

fn add_collaboration_edge(
    graph: &mut TrustGraph,
    from: &str,
    to: &str,
    tag: CollaborationTag,
    trust_lookup: &dyn TrustLookup,
) {
    ensure_node(graph, from, trust_lookup);
    ensure_node(graph, to, trust_lookup);
    graph.edges.push(Edge {
        from: from.to_string(),
        to: to.to_string(),
        edge_type: EdgeType::Collaboration,
        tag: Some(tag),
    });
    *graph
        .collaboration_counts
        .entry(collaboration_key(from, to))
        .or_insert(0) += 1;
}

fn add_delegation_edge(graph: &mut TrustGraph, from: &str, to: &str, trust_lookup: &dyn TrustLookup) {
    ensure_node(graph, from, trust_lookup);
    ensure_node(graph, to, trust_lookup);
    graph.edges.push(Edge {
        from: from.to_string(),
        to: to.to_string(),
        edge_type: EdgeType::Delegation,
        tag: None,
    });
    graph.nodes.get_mut(to).expect("just ensured").connections.r#in += 1;
    graph.nodes.get_mut(from).expect("just ensured").connections.out += 1;
}

/// Folds a single ledger entry into `graph`, in place. Entries must be
/// folded in ascending `index` order to match a full rebuild, though
/// nothing about a single fold depends on entries already present.
pub fn ingest_entry(graph: &mut TrustGraph, entry: &LedgerEntry, trust_lookup: &dyn TrustLookup) {
    ensure_node(graph, &entry.agent_id, trust_lookup);

    match entry.action_type.as_str() {
        "DELEGATION" => {
            if let Some(delegated_to) = entry.details.get("delegatedTo").and_then(|v| v.as_str()) {
                add_delegation_edge(graph, &entry.agent_id, delegated_to, trust_lookup);
            }
        }
        "NEGOTIATION" => {
            if let Some(counterparty) = entry.details.get("counterparty").and_then(|v| v.as_str()) {
                add_collaboration_edge(
                    graph,
                    &entry.agent_id,
                    counterparty,
                    CollaborationTag::Negotiation,
                    trust_lookup,
                );
            }
        }
        "COOPERATION" | "COOPERATIVE_COLLABORATION" => {
            if let Some(partners) = entry.details.get("partners").and_then(|v| v.as_array()) {
                for partner in partners.iter().filter_map(|v| v.as_str()) {
                    add_collaboration_edge(
                        graph,
                        &entry.agent_id,
                        partner,
                        CollaborationTag::Success,
                        trust_lookup,
                    );
                }
            }
        }
        "ECONOMIC" | "ECONOMIC_OUTCOME" => {
            let node = ensure_node(graph, &entry.agent_id, trust_lookup);
            let revenue = entry.details.get("revenue").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let pnl = entry.details.get("pnl").and_then(|v| v.as_f64()).unwrap_or(0.0);
            node.performance.revenue += revenue;
            node.performance.pnl += pnl;
            node.performance.count += 1;
        }
        "POLICY_VIOLATION" => {
            let node = ensure_node(graph, &entry.agent_id, trust_lookup);
            node.performance.violations += 1;
        }
        _ => {}
    }
}

/// Builds a complete graph from a live ledger's current snapshot.
pub fn from_ledger(
    ledger: &agentgov_ledger::ActivityLedger,
    trust_lookup: &dyn TrustLookup,
) -> TrustGraph {
    from_entries(&ledger.entries(), trust_lookup)
}

/// Builds a complete graph from a ledger snapshot, in `index` order.
pub fn from_entries(entries: &[LedgerEntry], trust_lookup: &dyn TrustLookup) -> TrustGraph {
    let mut graph = TrustGraph::new();
    let mut sorted: Vec<&LedgerEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.index);
    for entry in sorted {
        ingest_entry(&mut graph, entry, trust_lookup);
    }
    agentgov_telemetry::global_sink()
        .observe_graph_size(graph.nodes.len() as u64, graph.edges.len() as u64);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(index: u64, agent_id: &str, action_type: &str, details: serde_json::Value) -> LedgerEntry {
        LedgerEntry {
            index,
            timestamp: now(),
            agent_id: agent_id.to_string(),
            action_type: action_type.to_string(),
            details,
            prev_hash: None,
            hash: format!("hash-{index}"),
            signature: "sig".to_string(),
            public_key: "pem".to_string(),
        }
    }

    fn no_lookup(_: &str) -> (Option<f64>, Option<TrustProfile>) {
        (None, None)
    }

    #[test]
    fn incremental_ingest_matches_full_rebuild() {
        let entries = vec![
            entry(0, "a", "DELEGATION", json!({"delegatedTo": "b"})),
            entry(1, "a", "COOPERATION", json!({"partners": ["b", "c"]})),
            entry(2, "b", "POLICY_VIOLATION", json!({})),
            entry(3, "a", "ECONOMIC", json!({"revenue": 100.0, "pnl": 40.0})),
        ];

        let full = from_entries(&entries, &no_lookup);

        let mut incremental = TrustGraph::new();
        for e in &entries {
            ingest_entry(&mut incremental, e, &no_lookup);
        }

        assert_eq!(full.nodes.len(), incremental.nodes.len());
        assert_eq!(full.edges.len(), incremental.edges.len());
        assert_eq!(
            full.collaboration_counts,
            incremental.collaboration_counts
        );
    }

    #[test]
    fn delegation_updates_in_out_degree() {
        let entries = vec![entry(0, "a", "DELEGATION", json!({"delegatedTo": "b"}))];
        let graph = from_entries(&entries, &no_lookup);
        assert_eq!(graph.nodes["a"].connections.out, 1);
        assert_eq!(graph.nodes["b"].connections.r#in, 1);
    }

    #[test]
    fn cooperation_increments_symmetric_collaboration_counter() {
        let entries = vec![entry(0, "a", "COOPERATION", json!({"partners": ["b"]}))];
        let graph = from_entries(&entries, &no_lookup);
        assert_eq!(graph.collaboration_count("a", "b"), 1);
        assert_eq!(graph.collaboration_count("b", "a"), 1);
    }

    #[test]
    fn economic_entries_accumulate_node_performance() {
        let entries = vec![
            entry(0, "a", "ECONOMIC", json!({"revenue": 100.0, "pnl": 40.0})),
            entry(1, "a", "ECONOMIC", json!({"revenue": 50.0, "pnl": -10.0})),
        ];
        let graph = from_entries(&entries, &no_lookup);
        let node = &graph.nodes["a"];
        assert_eq!(node.performance.revenue, 150.0);
        assert_eq!(node.performance.pnl, 30.0);
        assert_eq!(node.performance.count, 2);
    }
}
