// Path: crates/agentgov/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Substrate
//!
//! Wires the identity registry, activity ledger, scoring pipeline,
//! adaptive governance tiering and validator, and trust graph analytics
//! into a single [`AgentGovernance`] facade matching the system's
//! normative public API (`registerAgent`, `validateIdentitySignature`,
//! `getTrustScore`, `updateReputation`, `getActivityHistory`,
//! `recordAction`, `getTrustGraph`, `forecastSynergy`,
//! `forecastSystemicRisk`, `discoverOpportunities`).

/// The facade's unified error type.
pub mod error;

use std::path::Path;
use std::sync::Arc;

use std::str::FromStr;

use agentgov_governance::{governance_profile, validate, GovernanceConfig};
use agentgov_graph::{self as graph, SynergyForecast, SystemicRiskReport, TrustGraph};
use agentgov_ledger::{ActivityLedger, AddEntryParams};
use agentgov_registry::{IdentityRegistry, RegisterIdentityParams, ValidateActionParams, ValidateActionResult};
use agentgov_scoring::ActionOutcome;
use agentgov_types::error::GovernanceError;
use agentgov_types::governance::{GovernanceProfile, Proposal, ValidationOutcome};
use agentgov_types::identity::Identity;
use agentgov_types::ledger::LedgerEntry;
use agentgov_types::scoring::{ScoringContext, TrustProfile};
use anyhow::Context;
use chrono::{DateTime, Utc};

pub use agentgov_crypto::{KeyPair, PublicKey};
pub use error::AgentGovernanceError;

/// Composes the identity registry, activity ledger, and governance
/// configuration into the system's single public entry point.
pub struct AgentGovernance {
    registry: Arc<IdentityRegistry>,
    ledger: ActivityLedger,
    governance_config: GovernanceConfig,
}

impl AgentGovernance {
    /// An empty, in-memory-only instance: nothing is persisted to disk.
    pub fn new() -> Self {
        let registry = Arc::new(IdentityRegistry::new());
        let ledger = ActivityLedger::with_registry(Utc::now(), Arc::clone(&registry));
        Self {
            registry,
            ledger,
            governance_config: GovernanceConfig::default(),
        }
    }

    /// Opens (or creates) an instance backed by an identity store file and
    /// a ledger file, migrating either on load if they predate the
    /// current schema.
    pub fn open(
        identity_store_path: impl AsRef<Path>,
        ledger_path: impl AsRef<Path>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let registry = Arc::new(
            IdentityRegistry::open(identity_store_path.as_ref())
                .context("opening identity store")?,
        );
        let ledger_path = ledger_path.as_ref();
        let ledger = if ledger_path.exists() {
            ActivityLedger::load_from_file(ledger_path, Some(Arc::clone(&registry)))
                .context("loading activity ledger")?
        } else {
            ActivityLedger::with_registry(now, Arc::clone(&registry))
        };
        Ok(Self {
            registry,
            ledger,
            governance_config: GovernanceConfig::default(),
        })
    }

    /// Persists the ledger to `ledger_path`; the identity store persists
    /// itself on every mutating registry call when opened with
    /// [`Self::open`].
    pub fn save_ledger(&self, ledger_path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ledger
            .save_to_file(ledger_path)
            .context("saving activity ledger")
    }

    /// Registers a fresh identity.
    pub fn register_agent(
        &self,
        params: RegisterIdentityParams,
        now: DateTime<Utc>,
    ) -> Result<Identity, AgentGovernanceError> {
        Ok(self.registry.register_identity(params, now)?)
    }

    /// Validates a signed action against a registered identity.
    pub fn validate_identity_signature(&self, params: ValidateActionParams) -> ValidateActionResult {
        self.registry.validate_action(params)
    }

    /// The current trust profile for `id`, if registered and scored.
    pub fn get_trust_score(&self, id: &str) -> Option<TrustProfile> {
        self.registry.get_identity_by_id(id)?.trust_profile
    }

    /// Evolves `id`'s performance snapshot against its elapsed time and
    /// recent action outcomes, recomputing its trust profile.
    pub fn update_reputation(
        &self,
        id: &str,
        recent_actions: &[ActionOutcome],
        now: DateTime<Utc>,
    ) -> Result<Identity, AgentGovernanceError> {
        let identity = self
            .registry
            .get_identity_by_id(id)
            .ok_or(agentgov_types::error::IdentityError::IdentityNotFound)?;
        let evolved = agentgov_scoring::evolve(&identity.performance, recent_actions, now);
        Ok(self
            .registry
            .update_performance(id, evolved, "REPUTATION_EVOLVED", now)?)
    }

    /// The complete activity history, or just `id`'s entries when supplied.
    pub fn get_activity_history(&self, id: Option<&str>) -> Vec<LedgerEntry> {
        let entries = self.ledger.entries();
        match id {
            Some(id) => entries.into_iter().filter(|e| e.agent_id == id).collect(),
            None => entries,
        }
    }

    /// Appends a signed action to the activity ledger.
    pub fn record_action(
        &self,
        params: AddEntryParams,
        now: DateTime<Utc>,
    ) -> Result<LedgerEntry, AgentGovernanceError> {
        Ok(self.ledger.add_entry(params, now)?)
    }

    /// Resolves `id`'s trust score to a governance profile. When `context`
    /// names one of the five [`ScoringContext`] projections, that
    /// projection of `id`'s stored trust profile is used in place of the
    /// composite score, per the context-aware tiering this facade exposes
    /// over [`agentgov_governance::governance_profile`].
    pub fn apply_governance_profile(
        &self,
        id: &str,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GovernanceProfile, AgentGovernanceError> {
        let identity = self
            .registry
            .get_identity_by_id(id)
            .ok_or(agentgov_types::error::IdentityError::IdentityNotFound)?;
        let score = resolve_score(&identity, context)?;
        Ok(governance_profile(&self.governance_config, score, context, now)?)
    }

    /// Validates `proposal` against `id`'s governance profile, resolved
    /// under `context` exactly as [`Self::apply_governance_profile`].
    pub fn validate_proposal(
        &self,
        id: &str,
        proposal: &Proposal,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ValidationOutcome, AgentGovernanceError> {
        let identity = self
            .registry
            .get_identity_by_id(id)
            .ok_or(agentgov_types::error::IdentityError::IdentityNotFound)?;
        let score = resolve_score(&identity, context)?;
        let profile = governance_profile(&self.governance_config, score, context, now)?;
        Ok(validate(&self.governance_config, &profile, score, proposal))
    }

    fn trust_lookup(&self, agent_id: &str) -> (Option<f64>, Option<TrustProfile>) {
        self.registry
            .get_identity_by_id(agent_id)
            .map(|i| (i.trust_score, i.trust_profile))
            .unwrap_or((None, None))
    }

    /// Rebuilds the trust graph from the full ledger snapshot.
    pub fn get_trust_graph(&self) -> TrustGraph {
        let lookup = |agent_id: &str| self.trust_lookup(agent_id);
        graph::from_ledger(&self.ledger, &lookup)
    }

    /// Forecasts the synergy of a candidate collaboration between `a`
    /// and `b`.
    pub fn forecast_synergy(&self, a: &str, b: &str) -> SynergyForecast {
        let trust_graph = self.get_trust_graph();
        graph::forecast_synergy(&trust_graph, a, b)
    }

    /// Aggregates risk clusters and central-node vulnerability into a
    /// system-wide risk report.
    pub fn forecast_systemic_risk(&self) -> SystemicRiskReport {
        let trust_graph = self.get_trust_graph();
        graph::forecast_systemic_risk(&trust_graph)
    }

    /// Surfaces the top 10 hidden synergies: pairs with no collaboration
    /// history but a high forecast synergy probability.
    pub fn discover_opportunities(&self) -> Vec<graph::HiddenSynergy> {
        let trust_graph = self.get_trust_graph();
        graph::hidden_synergies(&trust_graph, 10)
    }
}

/// Resolves the score a governance profile should be computed from: the
/// named context projection of `identity`'s stored trust profile, or its
/// composite score when `context` is `None`.
fn resolve_score(identity: &Identity, context: Option<&str>) -> Result<f64, AgentGovernanceError> {
    match context {
        Some(name) => {
            let parsed = ScoringContext::from_str(name).map_err(AgentGovernanceError::Governance)?;
            Ok(identity
                .trust_profile
                .as_ref()
                .map(|profile| profile.contexts.get(parsed))
                .unwrap_or(0.0))
        }
        None => Ok(identity.trust_score.unwrap_or(0.0)),
    }
}

impl Default for AgentGovernance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgov_crypto::KeyPair;
    use agentgov_types::error::ErrorCode;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn register_then_record_action_then_read_back_history() {
        let governance = AgentGovernance::new();
        let keypair = KeyPair::generate(2048).unwrap();
        let identity = governance
            .register_agent(
                RegisterIdentityParams {
                    public_key: keypair.public_key_pem().to_string(),
                    origin_system: "origin-a".to_string(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();

        governance
            .record_action(
                AddEntryParams {
                    agent_id: identity.id.clone(),
                    public_key: Some(keypair.public_key_pem().to_string()),
                    private_key_pem: Some(keypair.private_key_pem().unwrap()),
                    signature: None,
                    action_type: "ECONOMIC".to_string(),
                    details: json!({"revenue": 100.0, "pnl": 40.0}),
                    origin_system: None,
                },
                now(),
            )
            .unwrap();

        let history = governance.get_activity_history(Some(&identity.id));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn apply_governance_profile_reflects_default_performance() {
        let governance = AgentGovernance::new();
        let keypair = KeyPair::generate(2048).unwrap();
        let identity = governance
            .register_agent(
                RegisterIdentityParams {
                    public_key: keypair.public_key_pem().to_string(),
                    origin_system: "origin-a".to_string(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();

        let profile = governance
            .apply_governance_profile(&identity.id, None, now())
            .unwrap();
        assert_eq!(
            profile.tier,
            agentgov_types::governance::AuthorityTier::EliteAuthority
        );
    }

    #[test]
    fn unknown_agent_is_rejected_with_identity_not_found() {
        let governance = AgentGovernance::new();
        let err = governance
            .apply_governance_profile("did:agent:unknown", None, now())
            .unwrap_err();
        assert_eq!(err.code(), "IDENTITY_NOT_FOUND");
    }

    #[test]
    fn named_context_resolves_against_the_stored_trust_profile() {
        let governance = AgentGovernance::new();
        let keypair = KeyPair::generate(2048).unwrap();
        let identity = governance
            .register_agent(
                RegisterIdentityParams {
                    public_key: keypair.public_key_pem().to_string(),
                    origin_system: "origin-a".to_string(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();

        let composite_profile = governance
            .apply_governance_profile(&identity.id, None, now())
            .unwrap();
        let financial_profile = governance
            .apply_governance_profile(&identity.id, Some("financial"), now())
            .unwrap();

        assert_eq!(
            financial_profile.trust_score_snapshot,
            identity.trust_profile.unwrap().contexts.financial
        );
        assert_ne!(
            composite_profile.trust_score_snapshot,
            financial_profile.trust_score_snapshot
        );
    }

    #[test]
    fn unknown_context_name_is_rejected() {
        let governance = AgentGovernance::new();
        let keypair = KeyPair::generate(2048).unwrap();
        let identity = governance
            .register_agent(
                RegisterIdentityParams {
                    public_key: keypair.public_key_pem().to_string(),
                    origin_system: "origin-a".to_string(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();

        let err = governance
            .apply_governance_profile(&identity.id, Some("bogus"), now())
            .unwrap_err();
        assert!(matches!(
            err,
            AgentGovernanceError::Governance(GovernanceError::UnknownContext(_))
        ));
    }

    #[test]
    fn open_then_save_then_reopen_round_trips_identity_and_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let identity_store_path = dir.path().join("identities.json");
        let ledger_path = dir.path().join("ledger.json");
        let keypair = KeyPair::generate(2048).unwrap();

        let identity_id = {
            let governance =
                AgentGovernance::open(&identity_store_path, &ledger_path, now()).unwrap();
            let identity = governance
                .register_agent(
                    RegisterIdentityParams {
                        public_key: keypair.public_key_pem().to_string(),
                        origin_system: "origin-a".to_string(),
                        ..Default::default()
                    },
                    now(),
                )
                .unwrap();
            governance
                .record_action(
                    AddEntryParams {
                        agent_id: identity.id.clone(),
                        public_key: Some(keypair.public_key_pem().to_string()),
                        private_key_pem: Some(keypair.private_key_pem().unwrap()),
                        signature: None,
                        action_type: "ECONOMIC".to_string(),
                        details: json!({"revenue": 10.0, "pnl": 5.0}),
                        origin_system: None,
                    },
                    now(),
                )
                .unwrap();
            governance.save_ledger(&ledger_path).unwrap();
            identity.id
        };

        let reopened = AgentGovernance::open(&identity_store_path, &ledger_path, now()).unwrap();
        assert!(reopened.get_trust_score(&identity_id).is_some());
        assert_eq!(reopened.get_activity_history(Some(&identity_id)).len(), 1);
    }
}
