// Path: crates/registry/src/store.rs
//! The on-disk identity store shape and its schema migration registry.

use std::collections::HashMap;

use agentgov_types::identity::Identity;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;

/// The current store schema version new identities are stamped with.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// `{schemaVersion}` store-level metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMeta {
    /// The schema version this store file was last written under.
    pub schema_version: u32,
}

impl Default for StoreMeta {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// The complete on-disk identity store shape:
/// `{identities, meta, lastActionTimestamps}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityStoreFile {
    /// Every known identity, keyed by id.
    pub identities: HashMap<String, Identity>,
    /// Store-level metadata.
    pub meta: StoreMeta,
    /// Per-identity last accepted action timestamp, epoch milliseconds.
    pub last_action_timestamps: HashMap<String, i64>,
}

/// A single registered schema migration: applied to every identity whose
/// `schema_version` is strictly less than `to_version`.
pub struct Migration {
    /// The schema version this migration upgrades identities to.
    pub to_version: u32,
    /// The transform applied to each affected identity.
    pub apply: fn(Identity) -> Identity,
}

/// An ordered, extensible set of schema migrations, applied ascending by
/// `to_version` on store load when `store.meta.schema_version <
/// CURRENT_SCHEMA_VERSION`.
#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Migration>,
}

fn stamp_missing_schema_version(mut identity: Identity) -> Identity {
    if identity.schema_version == 0 {
        identity.schema_version = CURRENT_SCHEMA_VERSION;
    }
    identity
}

fn resolve_migration(name: &str) -> Option<fn(Identity) -> Identity> {
    match name {
        "stamp_missing_schema_version" => Some(stamp_missing_schema_version),
        _ => None,
    }
}

impl MigrationRegistry {
    /// The default migration registry: a single default migration that
    /// stamps any identity missing `schemaVersion` with the current
    /// version, matching the store-migration-on-load bullet normative
    /// behavior.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Migration {
            to_version: CURRENT_SCHEMA_VERSION,
            apply: stamp_missing_schema_version,
        });
        registry
    }

    /// Registers an additional migration, keeping the set sorted
    /// ascending by `to_version`.
    pub fn register(&mut self, migration: Migration) {
        self.migrations.push(migration);
        self.migrations.sort_by_key(|m| m.to_version);
    }

    /// Builds a migration registry from `config`'s declared migrations,
    /// resolving each [`crate::config::MigrationDescriptor`] by name.
    /// An unrecognized name is skipped rather than treated as an error.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::default();
        for descriptor in &config.migrations {
            if let Some(apply) = resolve_migration(&descriptor.name) {
                registry.register(Migration {
                    to_version: descriptor.to_version,
                    apply,
                });
            }
        }
        registry
    }

    /// Applies every migration with `to_version` greater than
    /// `from_version`, in ascending order, to `identity`.
    pub fn apply(&self, mut identity: Identity, from_version: u32) -> Identity {
        for migration in &self.migrations {
            if migration.to_version > from_version {
                identity = (migration.apply)(identity);
            }
        }
        identity
    }

    /// Migrates every identity in `store` whose store-level schema
    /// version predates [`CURRENT_SCHEMA_VERSION`], then bumps
    /// `store.meta.schema_version`.
    pub fn migrate_store(&self, store: &mut IdentityStoreFile) {
        if store.meta.schema_version >= CURRENT_SCHEMA_VERSION {
            return;
        }
        let from_version = store.meta.schema_version;
        for identity in store.identities.values_mut() {
            *identity = self.apply(identity.clone(), from_version);
        }
        store.meta.schema_version = CURRENT_SCHEMA_VERSION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgov_types::identity::{IdentityMetadata, PerformanceMetrics};
    use chrono::Utc;
    use std::sync::Arc;

    fn bare_identity(schema_version: u32) -> Identity {
        let now = Utc::now();
        Identity {
            id: "did:agent:test".to_string(),
            public_key: "pem".to_string(),
            origin_system: "origin".to_string(),
            metadata: IdentityMetadata {
                creation_timestamp: now,
                identity_version: "1.0.0".to_string(),
                version_history: Arc::new(vec![]),
            },
            performance: PerformanceMetrics::defaults(now),
            trust_profile: None,
            trust_score: None,
            revoked: false,
            revocation_reason: None,
            revocation_timestamp: None,
            schema_version,
        }
    }

    #[test]
    fn legacy_document_missing_schema_version_key_still_deserializes_and_migrates() {
        use serde_json::json;

        let now = Utc::now();
        let document = json!({
            "identities": {
                "did:agent:legacy": {
                    "id": "did:agent:legacy",
                    "publicKey": "pem",
                    "originSystem": "origin",
                    "metadata": {
                        "creationTimestamp": now,
                        "identityVersion": "1.0.0",
                        "versionHistory": [],
                    },
                    "performance": {
                        "reliability": 1.0,
                        "uptime": 1.0,
                        "consistency": 1.0,
                        "taskSuccessRate": 1.0,
                        "taskComplexityScore": 0.0,
                        "budgetEfficiency": 1.0,
                        "cooperationScore": 1.0,
                        "informationSharingScore": null,
                        "complianceHistory": 1.0,
                        "riskExposure": 0.05,
                        "policyViolations": 0,
                        "roi": 0.0,
                        "pnl": {
                            "totalRevenue": 0.0,
                            "totalExpenses": 0.0,
                            "netProfit": 0.0,
                        },
                        "lastUpdated": now,
                    },
                    "trustProfile": null,
                    "trustScore": null,
                    "revoked": false,
                    "revocationReason": null,
                    "revocationTimestamp": null,
                    // `schemaVersion` is deliberately absent: this is what a
                    // pre-migration document on disk actually looks like.
                },
            },
            "meta": { "schemaVersion": 0 },
            "lastActionTimestamps": {},
        });

        let mut store: IdentityStoreFile =
            serde_json::from_value(document).expect("legacy document must deserialize");
        assert_eq!(store.identities["did:agent:legacy"].schema_version, 0);

        let registry = MigrationRegistry::with_defaults();
        registry.migrate_store(&mut store);
        assert_eq!(
            store.identities["did:agent:legacy"].schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }

    #[test]
    fn migration_stamps_missing_schema_version() {
        let registry = MigrationRegistry::with_defaults();
        let mut store = IdentityStoreFile {
            meta: StoreMeta { schema_version: 0 },
            ..Default::default()
        };
        store
            .identities
            .insert("did:agent:test".to_string(), bare_identity(0));
        registry.migrate_store(&mut store);
        assert_eq!(store.meta.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(
            store.identities["did:agent:test"].schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }

    #[test]
    fn from_config_skips_unrecognized_migration_names() {
        let config = RegistryConfig {
            schema_version: CURRENT_SCHEMA_VERSION,
            migrations: vec![MigrationDescriptor {
                name: "some_future_migration".to_string(),
                to_version: CURRENT_SCHEMA_VERSION,
            }],
        };
        let registry = MigrationRegistry::from_config(&config);
        let mut store = IdentityStoreFile {
            meta: StoreMeta { schema_version: 0 },
            ..Default::default()
        };
        store
            .identities
            .insert("did:agent:test".to_string(), bare_identity(0));
        registry.migrate_store(&mut store);
        assert_eq!(
            store.identities["did:agent:test"].schema_version, 0,
            "an unrecognized migration name must not be silently applied"
        );
    }

    #[test]
    fn up_to_date_store_is_left_untouched() {
        let registry = MigrationRegistry::with_defaults();
        let mut store = IdentityStoreFile::default();
        store.identities.insert(
            "did:agent:test".to_string(),
            bare_identity(CURRENT_SCHEMA_VERSION),
        );
        registry.migrate_store(&mut store);
        assert_eq!(store.meta.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
