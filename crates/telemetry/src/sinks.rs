// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core
//! governance logic from whatever backend a host chooses to wire in.

use once_cell::sync::OnceCell;

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the globally configured metrics sink, or the no-op sink if
/// none has been set.
pub fn global_sink() -> &'static dyn MetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Sets the global metrics sink. May only be called once; subsequent
/// calls are ignored, matching `OnceCell`'s set-once semantics.
pub fn set_global_sink(sink: &'static dyn MetricsSink) {
    let _ = SINK.set(sink);
}

/// A sink for metrics related to identity registration, lookup,
/// revocation, and signed-action validation.
pub trait RegistryMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of identities registered.
    fn inc_identities_registered(&self);
    /// Increments the counter of identities revoked.
    fn inc_identities_revoked(&self);
    /// Increments a counter for a rejected `validateAction` call, labeled
    /// by its stable reason code.
    fn inc_validation_rejected(&self, reason_code: &'static str);
}
impl RegistryMetricsSink for NopSink {
    fn inc_identities_registered(&self) {}
    fn inc_identities_revoked(&self) {}
    fn inc_validation_rejected(&self, _reason_code: &'static str) {}
}

/// A sink for metrics related to the append-only activity ledger.
pub trait LedgerMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of entries appended.
    fn inc_entries_appended(&self);
    /// Increments a counter for a chain verification failure, labeled by
    /// its stable reason code.
    fn inc_verification_failed(&self, reason_code: &'static str);
    /// Observes the latency of an `addEntry` call.
    fn observe_append_duration(&self, duration_secs: f64);
}
impl LedgerMetricsSink for NopSink {
    fn inc_entries_appended(&self) {}
    fn inc_verification_failed(&self, _reason_code: &'static str) {}
    fn observe_append_duration(&self, _duration_secs: f64) {}
}

/// A sink for metrics related to governance tiering and the
/// pre-execution validator.
pub trait GovernanceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter of tier assignments, labeled by the resolved
    /// tier name.
    fn inc_tier_assigned(&self, tier: &'static str);
    /// Increments a counter for a validator outcome, labeled by whether
    /// the proposal was allowed.
    fn inc_validation_outcome(&self, allowed: bool);
}
impl GovernanceMetricsSink for NopSink {
    fn inc_tier_assigned(&self, _tier: &'static str) {}
    fn inc_validation_outcome(&self, _allowed: bool) {}
}

/// A sink for metrics related to trust graph construction and analytics.
pub trait GraphMetricsSink: Send + Sync + std::fmt::Debug {
    /// Observes the size of the graph after an incremental or full build.
    fn observe_graph_size(&self, nodes: u64, edges: u64);
    /// Increments the counter of synergy forecasts computed.
    fn inc_synergy_forecasts(&self);
}
impl GraphMetricsSink for NopSink {
    fn observe_graph_size(&self, _nodes: u64, _edges: u64) {}
    fn inc_synergy_forecasts(&self) {}
}

/// A unified sink implementing all domain-specific traits, providing a
/// single point of implementation for a concrete metrics backend.
pub trait MetricsSink:
    RegistryMetricsSink + LedgerMetricsSink + GovernanceMetricsSink + GraphMetricsSink
{
}

impl<T> MetricsSink for T where
    T: RegistryMetricsSink + LedgerMetricsSink + GovernanceMetricsSink + GraphMetricsSink
{
}
