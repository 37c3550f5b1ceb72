// Path: crates/registry/src/config.rs
//! Registry-level configuration: the current schema version and the
//! migrations a host expects to have registered on
//! [`crate::store::MigrationRegistry`], mirroring the governance crate's
//! overridable threshold tables.

use serde::{Deserialize, Serialize};

use crate::store::CURRENT_SCHEMA_VERSION;

/// A named schema migration, deserializable so a host can declare which
/// migrations it expects without recompiling. The transform itself still
/// has to be a known name [`crate::store::MigrationRegistry::from_config`]
/// can resolve; an unrecognized name is skipped rather than erroring, so
/// a config built for a newer binary degrades gracefully on an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationDescriptor {
    /// A short machine-readable name identifying the migration's logic.
    pub name: String,
    /// The schema version this migration upgrades identities to.
    pub to_version: u32,
}

/// The registry's expected schema version and registered migrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// The schema version new and migrated identities are stamped with.
    pub schema_version: u32,
    /// The migrations expected to be registered, applied ascending by
    /// `to_version` on store load.
    pub migrations: Vec<MigrationDescriptor>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            migrations: vec![MigrationDescriptor {
                name: "stamp_missing_schema_version".to_string(),
                to_version: CURRENT_SCHEMA_VERSION,
            }],
        }
    }
}
