// Path: crates/ledger/src/ledger.rs
//! The append-only, hash-chained, per-entry-signed activity ledger.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use agentgov_crypto::{canonical_json, sha256_hex, PublicKey};
use agentgov_registry::{IdentityRegistry, RegisterIdentityParams, ValidateActionParams};
use agentgov_types::error::LedgerError;
use agentgov_types::ledger::{ChainVerification, HashPreimage, LedgerEntry, LedgerFile};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use crate::config::LedgerConfig;

/// Parameters accepted by [`ActivityLedger::add_entry`].
#[derive(Debug, Clone, Default)]
pub struct AddEntryParams {
    /// The identity performing the action.
    pub agent_id: String,
    /// The PEM public key the signature verifies under.
    pub public_key: Option<String>,
    /// A PEM private key to sign the entry's hash with, when the caller
    /// hasn't already produced a signature.
    pub private_key_pem: Option<String>,
    /// A pre-computed signature over the entry's hash, lowercase hex.
    pub signature: Option<String>,
    /// The recognized or pass-through action type.
    pub action_type: String,
    /// Opaque, action-type-specific structured payload.
    pub details: Value,
    /// The origin system to auto-register an unknown identity under.
    pub origin_system: Option<String>,
}

fn compute_hash(
    index: u64,
    timestamp: DateTime<Utc>,
    agent_id: &str,
    action_type: &str,
    details: &Value,
    prev_hash: &Option<String>,
) -> Result<String, LedgerError> {
    let preimage = HashPreimage {
        index,
        timestamp,
        agent_id,
        action_type,
        details,
        prev_hash,
    };
    let bytes =
        canonical_json(&preimage).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    Ok(sha256_hex(bytes))
}

/// An append-only, hash-chained, per-entry-signed log of agent actions.
///
/// The `Vec<LedgerEntry>` and the attached registry's replay state are
/// the two resources the concurrency model requires mutual exclusion
/// for; both are reached only through this struct's single mutex, so
/// concurrent writers serialize on append.
pub struct ActivityLedger {
    created_at: DateTime<Utc>,
    entries: Mutex<Vec<LedgerEntry>>,
    registry: Option<Arc<IdentityRegistry>>,
    config: LedgerConfig,
}

impl ActivityLedger {
    /// Creates a fresh, empty ledger with no attached registry:
    /// signatures are verified locally against the supplied public key.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self::with_registry_and_config(created_at, None, LedgerConfig::default())
    }

    /// Creates a fresh, empty ledger whose signature verification is
    /// routed through `registry`, inheriting its replay and revocation
    /// semantics.
    pub fn with_registry(created_at: DateTime<Utc>, registry: Arc<IdentityRegistry>) -> Self {
        Self::with_registry_and_config(created_at, Some(registry), LedgerConfig::default())
    }

    /// Creates a fresh, empty ledger with no attached registry, overriding
    /// the default genesis and auto-registration settings.
    pub fn with_config(created_at: DateTime<Utc>, config: LedgerConfig) -> Self {
        Self::with_registry_and_config(created_at, None, config)
    }

    /// Creates a fresh, empty ledger with both an attached registry and
    /// overridden genesis/auto-registration settings.
    pub fn with_registry_and_config(
        created_at: DateTime<Utc>,
        registry: Option<Arc<IdentityRegistry>>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            created_at,
            entries: Mutex::new(Vec::new()),
            registry,
            config,
        }
    }

    /// The number of entries currently in the ledger.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the ledger currently has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns a snapshot of every entry, in index order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().clone()
    }

    fn verify_or_register(
        &self,
        agent_id: &str,
        public_key: Option<&str>,
        origin_system: Option<&str>,
        hash: &str,
        signature: &str,
    ) -> Result<(), LedgerError> {
        let Some(registry) = &self.registry else {
            let public_key = public_key.ok_or(LedgerError::MissingRequired("publicKey"))?;
            let key = PublicKey::from_pem(public_key)
                .map_err(|_| LedgerError::Identity(agentgov_types::error::IdentityError::InvalidSignature))?;
            return key
                .verify(hash.as_bytes(), signature)
                .map_err(|_| LedgerError::Identity(agentgov_types::error::IdentityError::InvalidSignature));
        };

        let result = registry.validate_action(ValidateActionParams {
            agent_id: Some(agent_id.to_string()),
            public_key: public_key.map(str::to_string),
            message: hash.as_bytes().to_vec(),
            signature: signature.to_string(),
            timestamp: None,
            origin_system: origin_system.map(str::to_string),
        });

        if result.valid {
            return Ok(());
        }

        if result.reason == Some("IDENTITY_NOT_FOUND") && !self.config.auto_register_unknown_identities {
            return Err(LedgerError::Identity(
                agentgov_types::error::IdentityError::IdentityNotFound,
            ));
        }

        if result.reason == Some("IDENTITY_NOT_FOUND") {
            let public_key = public_key.ok_or(LedgerError::MissingRequired("publicKey"))?;
            let origin_system = origin_system.unwrap_or("unknown").to_string();
            registry
                .register_identity(
                    RegisterIdentityParams {
                        public_key: public_key.to_string(),
                        origin_system,
                        id: Some(agent_id.to_string()),
                        ..Default::default()
                    },
                    Utc::now(),
                )
                .map_err(LedgerError::Identity)?;

            let retry = registry.validate_action(ValidateActionParams {
                agent_id: Some(agent_id.to_string()),
                public_key: Some(public_key.to_string()),
                message: hash.as_bytes().to_vec(),
                signature: signature.to_string(),
                timestamp: None,
                origin_system: None,
            });
            if retry.valid {
                return Ok(());
            }
        }

        Err(LedgerError::Identity(
            agentgov_types::error::IdentityError::InvalidSignature,
        ))
    }

    /// Appends a new entry: builds the draft, computes its hash, signs or
    /// verifies the supplied signature, and freezes the result.
    ///
    /// The entry is never partially appended: on any failure before the
    /// final push, the ledger is left exactly as it was.
    pub fn add_entry(
        &self,
        params: AddEntryParams,
        now: DateTime<Utc>,
    ) -> Result<LedgerEntry, LedgerError> {
        if params.agent_id.is_empty() {
            return Err(LedgerError::MissingRequired("agentId"));
        }
        if params.action_type.is_empty() {
            return Err(LedgerError::MissingRequired("actionType"));
        }

        let _timer = agentgov_telemetry::time::AppendTimer::new(agentgov_telemetry::global_sink());

        let mut entries = self.entries.lock();
        let index = entries.len() as u64;
        let prev_hash = entries
            .last()
            .map(|e| e.hash.clone())
            .or_else(|| self.config.genesis_prev_hash.clone());

        let hash = compute_hash(
            index,
            now,
            &params.agent_id,
            &params.action_type,
            &params.details,
            &prev_hash,
        )?;

        let signature = match &params.signature {
            Some(signature) => signature.clone(),
            None => {
                let private_key_pem = params
                    .private_key_pem
                    .as_deref()
                    .ok_or(LedgerError::MissingRequired("privateKey"))?;
                let keypair = agentgov_crypto::KeyPair::from_private_key_pem(private_key_pem)
                    .map_err(|_| {
                        LedgerError::Identity(agentgov_types::error::IdentityError::InvalidSignature)
                    })?;
                keypair.sign(hash.as_bytes()).map_err(|_| {
                    LedgerError::Identity(agentgov_types::error::IdentityError::InvalidSignature)
                })?
            }
        };

        let public_key = params
            .public_key
            .clone()
            .or_else(|| {
                params
                    .private_key_pem
                    .as_deref()
                    .and_then(|pem| agentgov_crypto::KeyPair::from_private_key_pem(pem).ok())
                    .map(|kp| kp.public_key_pem().to_string())
            })
            .ok_or(LedgerError::MissingRequired("publicKey"))?;

        self.verify_or_register(
            &params.agent_id,
            Some(&public_key),
            params.origin_system.as_deref(),
            &hash,
            &signature,
        )?;

        let entry = LedgerEntry {
            index,
            timestamp: now,
            agent_id: params.agent_id,
            action_type: params.action_type,
            details: params.details,
            prev_hash,
            hash,
            signature,
            public_key,
        };

        entries.push(entry.clone());
        agentgov_telemetry::global_sink().inc_entries_appended();
        tracing::info!(index = entry.index, agent_id = %entry.agent_id, "appended ledger entry");
        Ok(entry)
    }

    /// Verifies the entire chain, returning the first offending index and
    /// reason code, or a valid result if every entry checks out.
    pub fn verify_chain(&self) -> ChainVerification {
        let entries = self.entries.lock();
        for (i, entry) in entries.iter().enumerate() {
            let recomputed = match compute_hash(
                entry.index,
                entry.timestamp,
                &entry.agent_id,
                &entry.action_type,
                &entry.details,
                &entry.prev_hash,
            ) {
                Ok(hash) => hash,
                Err(_) => {
                    return failure(entry.index, "HASH_MISMATCH");
                }
            };
            if recomputed != entry.hash {
                agentgov_telemetry::global_sink().inc_verification_failed("HASH_MISMATCH");
                return failure(entry.index, "HASH_MISMATCH");
            }

            if i == 0 {
                if entry.prev_hash != self.config.genesis_prev_hash {
                    agentgov_telemetry::global_sink()
                        .inc_verification_failed("GENESIS_PREVHASH_NOT_NULL");
                    return failure(entry.index, "GENESIS_PREVHASH_NOT_NULL");
                }
            } else {
                let expected = &entries[i - 1].hash;
                if entry.prev_hash.as_ref() != Some(expected) {
                    agentgov_telemetry::global_sink().inc_verification_failed("CHAIN_LINK_BROKEN");
                    return failure(entry.index, "CHAIN_LINK_BROKEN");
                }
            }

            let verifies = PublicKey::from_pem(&entry.public_key)
                .and_then(|key| key.verify(entry.hash.as_bytes(), &entry.signature))
                .is_ok();
            if !verifies {
                agentgov_telemetry::global_sink().inc_verification_failed("INVALID_SIGNATURE");
                return failure(entry.index, "INVALID_SIGNATURE");
            }
        }

        ChainVerification {
            valid: true,
            index: None,
            reason: None,
        }
    }

    /// Writes `{createdAt, entries}` as pretty-printed UTF-8 JSON to
    /// `path`. Uses a scoped file handle so the handle is released on
    /// every path, success or failure.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let file = LedgerFile {
            created_at: self.created_at,
            entries: self.entries.lock().clone(),
        };
        let json =
            serde_json::to_string_pretty(&file).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), json).map_err(|e| LedgerError::Io(e.to_string()))
    }

    /// Loads and freezes a ledger from `path` under the default genesis
    /// and auto-registration settings, verifying identically to one
    /// built in memory.
    pub fn load_from_file(
        path: impl AsRef<Path>,
        registry: Option<Arc<IdentityRegistry>>,
    ) -> Result<Self, LedgerError> {
        Self::load_from_file_with_config(path, registry, LedgerConfig::default())
    }

    /// Loads and freezes a ledger from `path`, overriding the default
    /// genesis and auto-registration settings.
    pub fn load_from_file_with_config(
        path: impl AsRef<Path>,
        registry: Option<Arc<IdentityRegistry>>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let contents =
            fs::read_to_string(path.as_ref()).map_err(|e| LedgerError::Io(e.to_string()))?;
        let file: LedgerFile =
            serde_json::from_str(&contents).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(Self {
            created_at: file.created_at,
            entries: Mutex::new(file.entries),
            registry,
            config,
        })
    }

    /// When this ledger was first created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn failure(index: u64, reason: &'static str) -> ChainVerification {
    ChainVerification {
        valid: false,
        index: Some(index),
        reason: Some(reason.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgov_crypto::KeyPair;
    use serde_json::json;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn registry_with_identity(keypair: &KeyPair) -> Arc<IdentityRegistry> {
        let registry = IdentityRegistry::new();
        registry
            .register_identity(
                RegisterIdentityParams {
                    public_key: keypair.public_key_pem().to_string(),
                    origin_system: "origin-a".to_string(),
                    id: Some("did:agent:alice".to_string()),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        Arc::new(registry)
    }

    #[test]
    fn append_then_verify_chain_is_valid() {
        let keypair = KeyPair::generate(2048).unwrap();
        let registry = registry_with_identity(&keypair);
        let ledger = ActivityLedger::with_registry(now(), registry);
        for i in 0..3 {
            ledger
                .add_entry(
                    AddEntryParams {
                        agent_id: "did:agent:alice".to_string(),
                        public_key: Some(keypair.public_key_pem().to_string()),
                        private_key_pem: Some(keypair.private_key_pem().unwrap()),
                        signature: None,
                        action_type: "ECONOMIC".to_string(),
                        details: json!({"n": i}),
                        origin_system: None,
                    },
                    now(),
                )
                .unwrap();
        }
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify_chain().valid);
    }

    #[test]
    fn tampered_entry_breaks_chain_verification() {
        let keypair = KeyPair::generate(2048).unwrap();
        let registry = registry_with_identity(&keypair);
        let ledger = ActivityLedger::with_registry(now(), registry);
        ledger
            .add_entry(
                AddEntryParams {
                    agent_id: "did:agent:alice".to_string(),
                    public_key: Some(keypair.public_key_pem().to_string()),
                    private_key_pem: Some(keypair.private_key_pem().unwrap()),
                    signature: None,
                    action_type: "ECONOMIC".to_string(),
                    details: json!({"n": 1}),
                    origin_system: None,
                },
                now(),
            )
            .unwrap();

        {
            let mut entries = ledger.entries.lock();
            entries[0].details = json!({"n": 999});
        }

        let result = ledger.verify_chain();
        assert!(!result.valid);
        assert_eq!(result.index, Some(0));
    }

    #[test]
    fn save_then_load_round_trips() {
        let keypair = KeyPair::generate(2048).unwrap();
        let registry = registry_with_identity(&keypair);
        let ledger = ActivityLedger::with_registry(now(), registry);
        ledger
            .add_entry(
                AddEntryParams {
                    agent_id: "did:agent:alice".to_string(),
                    public_key: Some(keypair.public_key_pem().to_string()),
                    private_key_pem: Some(keypair.private_key_pem().unwrap()),
                    signature: None,
                    action_type: "ECONOMIC".to_string(),
                    details: json!({"n": 1}),
                    origin_system: None,
                },
                now(),
            )
            .unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        ledger.save_to_file(&path).unwrap();

        let loaded = ActivityLedger::load_from_file(&path, None).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn configured_genesis_prev_hash_is_chained_onto_the_first_entry() {
        let keypair = KeyPair::generate(2048).unwrap();
        let registry = registry_with_identity(&keypair);
        let config = LedgerConfig {
            genesis_prev_hash: Some("anchor-hash".to_string()),
            ..LedgerConfig::default()
        };
        let ledger = ActivityLedger::with_registry_and_config(now(), Some(registry), config);

        let entry = ledger
            .add_entry(
                AddEntryParams {
                    agent_id: "did:agent:alice".to_string(),
                    public_key: Some(keypair.public_key_pem().to_string()),
                    private_key_pem: Some(keypair.private_key_pem().unwrap()),
                    signature: None,
                    action_type: "ECONOMIC".to_string(),
                    details: json!({"n": 1}),
                    origin_system: None,
                },
                now(),
            )
            .unwrap();

        assert_eq!(entry.prev_hash.as_deref(), Some("anchor-hash"));
        assert!(ledger.verify_chain().valid);
    }

    #[test]
    fn disabling_auto_registration_rejects_an_unknown_identity() {
        let config = LedgerConfig {
            auto_register_unknown_identities: false,
            ..LedgerConfig::default()
        };
        let ledger = ActivityLedger::with_registry_and_config(
            now(),
            Some(Arc::new(IdentityRegistry::new())),
            config,
        );
        let keypair = KeyPair::generate(2048).unwrap();

        let err = ledger
            .add_entry(
                AddEntryParams {
                    agent_id: "did:agent:unregistered".to_string(),
                    public_key: Some(keypair.public_key_pem().to_string()),
                    private_key_pem: Some(keypair.private_key_pem().unwrap()),
                    signature: None,
                    action_type: "ECONOMIC".to_string(),
                    details: json!({"n": 1}),
                    origin_system: None,
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Identity(agentgov_types::error::IdentityError::IdentityNotFound)
        ));
        assert_eq!(ledger.len(), 0);
    }
}
