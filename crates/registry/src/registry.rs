// Path: crates/registry/src/registry.rs
//! The keyed, persistent identity registry: issues, looks up, revokes,
//! and validates signed actions against identities, with per-identity
//! replay protection.

use std::fs;
use std::path::{Path, PathBuf};

use agentgov_types::error::IdentityError;
use agentgov_types::identity::{Identity, PerformanceMetrics};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::RegistryConfig;
use crate::identity as identity_ops;
use crate::store::{IdentityStoreFile, MigrationRegistry};

/// Parameters accepted by [`IdentityRegistry::register_identity`].
#[derive(Debug, Clone, Default)]
pub struct RegisterIdentityParams {
    /// Opaque PEM-encoded RSA public key.
    pub public_key: String,
    /// Free-form origin tag.
    pub origin_system: String,
    /// An explicit id override, bypassing the default derivation.
    pub id: Option<String>,
    /// An explicit initial performance snapshot.
    pub performance: Option<PerformanceMetrics>,
    /// Re-bind `public_key` to `origin_system` even if it is already
    /// bound to a different origin.
    pub force: bool,
}

/// Parameters accepted by [`IdentityRegistry::validate_action`].
#[derive(Debug, Clone, Default)]
pub struct ValidateActionParams {
    /// The identity to resolve by id, if supplied.
    pub agent_id: Option<String>,
    /// The identity to resolve by public key, if `agent_id` is absent.
    pub public_key: Option<String>,
    /// The message the signature covers.
    pub message: Vec<u8>,
    /// The RSA-PSS/SHA-256 signature over `message`, lowercase hex.
    pub signature: String,
    /// An ISO-8601 timestamp to check for replay, if supplied.
    pub timestamp: Option<String>,
    /// The origin system to cross-check against the resolved identity.
    pub origin_system: Option<String>,
}

/// The outcome of [`IdentityRegistry::validate_action`].
#[derive(Debug, Clone)]
pub struct ValidateActionResult {
    /// Whether the action is valid.
    pub valid: bool,
    /// A stable machine-readable reason code, populated when invalid.
    pub reason: Option<&'static str>,
    /// The resolved identity, when one could be found.
    pub identity: Option<Identity>,
}

/// A keyed, persistent store of [`Identity`] records. Reads and writes
/// are serialized behind a single writer lock per instance, matching the
/// one-writer-per-store-or-ledger concurrency model: readers of a
/// consistent snapshot never need to block on it.
pub struct IdentityRegistry {
    store: Mutex<IdentityStoreFile>,
    migrations: MigrationRegistry,
    path: Option<PathBuf>,
}

impl IdentityRegistry {
    /// Creates an empty, in-memory-only registry.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(IdentityStoreFile::default()),
            migrations: MigrationRegistry::with_defaults(),
            path: None,
        }
    }

    /// Opens a registry backed by `path`: loads and migrates an existing
    /// store if the file exists, otherwise starts empty. Every successful
    /// mutating operation persists back to `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        Self::open_with_config(path, &RegistryConfig::default())
    }

    /// Opens a registry exactly as [`Self::open`], building its migration
    /// set from `config` instead of the default registered migrations.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: &RegistryConfig,
    ) -> Result<Self, IdentityError> {
        let path = path.as_ref().to_path_buf();
        let migrations = MigrationRegistry::from_config(config);
        let mut store = if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| IdentityError::InvalidTimestamp(e.to_string()))?;
            serde_json::from_str(&contents)
                .map_err(|e| IdentityError::InvalidTimestamp(e.to_string()))?
        } else {
            IdentityStoreFile::default()
        };
        migrations.migrate_store(&mut store);
        Ok(Self {
            store: Mutex::new(store),
            migrations,
            path: Some(path),
        })
    }

    fn persist(&self, store: &IdentityStoreFile) -> Result<(), IdentityError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(store)
                .map_err(|e| IdentityError::InvalidTimestamp(e.to_string()))?;
            fs::write(path, json).map_err(|e| IdentityError::InvalidTimestamp(e.to_string()))?;
        }
        Ok(())
    }

    /// Registers a fresh identity. Fails with
    /// [`IdentityError::MissingRequired`] if `publicKey` or `originSystem`
    /// is absent, or [`IdentityError::OriginConflict`] if `publicKey` is
    /// already bound to a different origin and `force` was not set.
    pub fn register_identity(
        &self,
        params: RegisterIdentityParams,
        now: DateTime<Utc>,
    ) -> Result<Identity, IdentityError> {
        let mut store = self.store.lock();

        if let Some(existing) = store
            .identities
            .values()
            .find(|i| i.public_key == params.public_key)
        {
            if existing.origin_system != params.origin_system && !params.force {
                return Err(IdentityError::OriginConflict);
            }
        }

        let identity = identity_ops::new(
            &params.public_key,
            &params.origin_system,
            params.id,
            None,
            params.performance,
            now,
        )?;

        store.identities.insert(identity.id.clone(), identity.clone());
        self.persist(&store)?;
        tracing::info!(agent_id = %identity.id, "registered identity");
        agentgov_telemetry::global_sink().inc_identities_registered();
        Ok(identity)
    }

    /// Looks up an identity by id.
    pub fn get_identity_by_id(&self, id: &str) -> Option<Identity> {
        self.store.lock().identities.get(id).cloned()
    }

    /// Looks up an identity by its public key.
    pub fn get_identity_by_public_key(&self, public_key: &str) -> Option<Identity> {
        self.store
            .lock()
            .identities
            .values()
            .find(|i| i.public_key == public_key)
            .cloned()
    }

    /// Revokes the identity keyed by `id`, recording `reason` and the
    /// revocation timestamp.
    pub fn revoke_identity(
        &self,
        id: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, IdentityError> {
        let mut store = self.store.lock();
        let identity = store
            .identities
            .get_mut(id)
            .ok_or(IdentityError::IdentityNotFound)?;
        identity.revoked = true;
        identity.revocation_reason = Some(reason.to_string());
        identity.revocation_timestamp = Some(now);
        let updated = identity.clone();
        self.persist(&store)?;
        tracing::info!(agent_id = %id, "revoked identity");
        agentgov_telemetry::global_sink().inc_identities_revoked();
        Ok(updated)
    }

    /// Applies a new performance snapshot to the identity keyed by `id`,
    /// recomputing its trust profile and appending exactly one version
    /// history entry via [`identity_ops::update_performance`].
    pub fn update_performance(
        &self,
        id: &str,
        performance: PerformanceMetrics,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, IdentityError> {
        let mut store = self.store.lock();
        let current = store
            .identities
            .get(id)
            .cloned()
            .ok_or(IdentityError::IdentityNotFound)?;
        let updated = identity_ops::update_performance(&current, performance, reason, now);
        store.identities.insert(id.to_string(), updated.clone());
        self.persist(&store)?;
        tracing::info!(agent_id = %id, reason, "updated identity performance");
        Ok(updated)
    }

    fn resolve(&self, params: &ValidateActionParams) -> Option<Identity> {
        if let Some(id) = &params.agent_id {
            return self.get_identity_by_id(id);
        }
        if let Some(public_key) = &params.public_key {
            return self.get_identity_by_public_key(public_key);
        }
        None
    }

    /// Validates a signed action, applying revocation, origin, replay,
    /// and signature checks in the normative order and updating the
    /// per-identity last-action timestamp on success. If the store is
    /// backed by a file and persisting the updated timestamp fails, the
    /// in-memory update is rolled back and the action is rejected with
    /// `PERSISTENCE_FAILED` rather than reported valid ahead of disk.
    pub fn validate_action(&self, params: ValidateActionParams) -> ValidateActionResult {
        let reject = |reason: &'static str, identity: Option<Identity>| {
            agentgov_telemetry::global_sink().inc_validation_rejected(reason);
            ValidateActionResult {
                valid: false,
                reason: Some(reason),
                identity,
            }
        };

        let identity = match self.resolve(&params) {
            Some(identity) => identity,
            None => return reject("IDENTITY_NOT_FOUND", None),
        };

        if identity.revoked {
            return reject("IDENTITY_REVOKED", Some(identity));
        }

        if let Some(origin_system) = &params.origin_system {
            if origin_system != &identity.origin_system {
                return reject("ORIGIN_MISMATCH", Some(identity));
            }
        }

        let mut store = self.store.lock();
        let parsed_timestamp = if let Some(timestamp) = &params.timestamp {
            match DateTime::parse_from_rfc3339(timestamp) {
                Ok(parsed) => {
                    let parsed = parsed.with_timezone(&Utc);
                    let last = store.last_action_timestamps.get(&identity.id).copied();
                    if let Some(last) = last {
                        if parsed.timestamp_millis() <= last {
                            return reject("REPLAY_DETECTED", Some(identity));
                        }
                    }
                    Some(parsed)
                }
                Err(_) => return reject("INVALID_TIMESTAMP", Some(identity)),
            }
        } else {
            None
        };

        if !identity_ops::verify_signature(&identity, &params.message, &params.signature) {
            return reject("INVALID_SIGNATURE", Some(identity));
        }

        let previous_timestamp = parsed_timestamp.map(|parsed| {
            let previous = store.last_action_timestamps.get(&identity.id).copied();
            store
                .last_action_timestamps
                .insert(identity.id.clone(), parsed.timestamp_millis());
            previous
        });

        if self.persist(&store).is_err() {
            if parsed_timestamp.is_some() {
                match previous_timestamp.flatten() {
                    Some(previous) => {
                        store.last_action_timestamps.insert(identity.id.clone(), previous);
                    }
                    None => {
                        store.last_action_timestamps.remove(&identity.id);
                    }
                }
            }
            return reject("PERSISTENCE_FAILED", Some(identity));
        }

        ValidateActionResult {
            valid: true,
            reason: None,
            identity: Some(identity),
        }
    }

    /// Applies `transform` to the stored identity keyed by `id`,
    /// constructs a fresh identity from the result, appends a
    /// `SCHEMA_MIGRATION` history entry, and writes back.
    pub fn migrate_identity(
        &self,
        id: &str,
        transform: impl FnOnce(Identity) -> Identity,
        details: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, IdentityError> {
        let mut store = self.store.lock();
        let current = store
            .identities
            .get(id)
            .cloned()
            .ok_or(IdentityError::IdentityNotFound)?;
        let migrated = identity_ops::migrate(&current, transform, details, now);
        store.identities.insert(id.to_string(), migrated.clone());
        self.persist(&store)?;
        Ok(migrated)
    }

    /// Re-applies the registered migrations to the in-memory store. Used
    /// by callers that register additional migrations after construction.
    pub fn remigrate(&self) {
        let mut store = self.store.lock();
        self.migrations.migrate_store(&mut store);
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
