// Path: crates/graph/src/types.rs
//! The trust graph's node and edge shapes.

use std::collections::BTreeMap;

use agentgov_types::scoring::TrustProfile;
use serde::{Deserialize, Serialize};

/// Either end of a collaboration edge, named by entry type since the
/// ledger never separately records a success/failure verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaborationTag {
    /// Produced by a `NEGOTIATION` entry.
    Negotiation,
    /// Produced by a `COOPERATION` entry: partners acting together is
    /// taken as the ledger's only positive collaboration signal.
    Success,
}

/// The two edge kinds a trust graph carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// A directed delegation from one agent to another.
    Delegation,
    /// An undirected collaboration, tagged by the entry that produced it.
    Collaboration,
}

/// A single typed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// The source node (the acting agent).
    pub from: String,
    /// The target node (the delegate or counterparty).
    pub to: String,
    /// The edge's type.
    pub edge_type: EdgeType,
    /// The collaboration tag, set only for `COLLABORATION` edges.
    pub tag: Option<CollaborationTag>,
}

/// Accumulated economic and compliance performance for a node, built
/// from `ECONOMIC` and `POLICY_VIOLATION` entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePerformance {
    /// Sum of `details.revenue` across `ECONOMIC` entries for this agent.
    pub revenue: f64,
    /// Sum of `details.pnl` across `ECONOMIC` entries for this agent.
    pub pnl: f64,
    /// Count of `POLICY_VIOLATION` entries for this agent.
    pub violations: u64,
    /// Total number of `ECONOMIC` entries recorded for this agent.
    pub count: u64,
}

/// In/out degree counts over `DELEGATION` edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connections {
    /// Number of incoming delegation edges.
    pub r#in: u64,
    /// Number of outgoing delegation edges.
    pub out: u64,
}

/// A single node's aggregated state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAggregate {
    /// The node's current trust composite, looked up at first touch.
    pub trust_score: Option<f64>,
    /// The node's current trust profile, looked up at first touch.
    pub trust_profile: Option<TrustProfile>,
    /// Accumulated economic/compliance performance.
    pub performance: NodePerformance,
    /// In/out delegation degree.
    pub connections: Connections,
}

/// Builds the symmetric key `sort(id1,id2).join('<->')` used to key the
/// undirected collaboration counter map.
pub fn collaboration_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}<->{b}")
    } else {
        format!("{b}<->{a}")
    }
}

/// The trust graph: nodes keyed by agent id, a flat edge list, and a
/// symmetric collaboration-frequency counter.
///
/// A `BTreeMap` keeps node and counter iteration order deterministic
/// across processes, which every analytic that sorts by a computed
/// score (and needs a stable tie-break) depends on.
#[derive(Debug, Clone, Default)]
pub struct TrustGraph {
    /// Node aggregates keyed by agent id.
    pub nodes: BTreeMap<String, NodeAggregate>,
    /// The complete, in-order edge list.
    pub edges: Vec<Edge>,
    /// Symmetric collaboration counts keyed by [`collaboration_key`].
    pub collaboration_counts: BTreeMap<String, u64>,
}

impl TrustGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collaboration count between `a` and `b`, or zero if they have
    /// never collaborated.
    pub fn collaboration_count(&self, a: &str, b: &str) -> u64 {
        self.collaboration_counts
            .get(&collaboration_key(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Every collaboration edge touching `node`, directed or not.
    pub fn collaboration_edges_touching<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges
            .iter()
            .filter(move |e| e.edge_type == EdgeType::Collaboration && (e.from == node || e.to == node))
    }

    /// Every delegation edge touching `node`, directed or not.
    pub fn delegation_edges_touching<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges
            .iter()
            .filter(move |e| e.edge_type == EdgeType::Delegation && (e.from == node || e.to == node))
    }
}
