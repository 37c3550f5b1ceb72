// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Agent Governance Telemetry
//!
//! Observability infrastructure for the agent governance substrate:
//! structured logging initialization and abstract sinks that decouple
//! instrumentation from any specific metrics backend.

/// The initialization routine for global structured logging.
pub mod init;
/// Abstract traits (`*MetricsSink`) that define the contract for metrics
/// reporting, scoped to the registry, ledger, governance, and graph
/// domains.
pub mod sinks;
/// A simple RAII timer for measuring the duration of a scope.
pub mod time;

pub use init::init_tracing;
pub use sinks::{
    global_sink, set_global_sink, GovernanceMetricsSink, GraphMetricsSink, LedgerMetricsSink,
    MetricsSink, NopSink, RegistryMetricsSink,
};
