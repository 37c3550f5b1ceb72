// Path: crates/graph/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Trust Graph
//!
//! Builds an in-memory trust graph from an activity ledger's entries —
//! incrementally or via a full rebuild that produces an identical
//! result — and computes centrality, impact, risk-cluster,
//! delegation-chain, synergy-forecast, and systemic-risk analytics over
//! it.

/// Centrality, impact, risk-cluster, and delegation-chain analytics.
pub mod analytics;
/// Incremental and full-rebuild graph construction.
pub mod build;
/// Synergy forecasting and systemic risk aggregation.
pub mod forecast;
/// Node and edge shapes.
pub mod types;

pub use analytics::{central_nodes, delegation_chains, high_impact_contributors, risk_clusters, RiskCluster};
pub use build::{from_entries, from_ledger, ingest_entry, TrustLookup};
pub use forecast::{
    forecast_synergy, forecast_systemic_risk, hidden_synergies, CriticalVulnerability,
    HiddenSynergy, Recommendation, SynergyForecast, SystemicRiskReport,
};
pub use types::{
    collaboration_key, CollaborationTag, Connections, Edge, EdgeType, NodeAggregate,
    NodePerformance, TrustGraph,
};
