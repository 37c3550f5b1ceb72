// Path: crates/registry/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Registry
//!
//! Identity record construction and every state transition
//! (`update_performance`, `upgrade`, `migrate`), plus the keyed,
//! persistent [`IdentityRegistry`] that issues, looks up, revokes, and
//! validates signed actions with per-identity replay protection.

/// Overridable schema version and migration declarations.
pub mod config;
/// Identity construction and state transitions.
pub mod identity;
/// The keyed identity registry.
pub mod registry;
/// The on-disk store shape and schema migration registry.
pub mod store;

pub use config::{MigrationDescriptor, RegistryConfig};
pub use registry::{
    IdentityRegistry, RegisterIdentityParams, ValidateActionParams, ValidateActionResult,
};
pub use store::{Migration, MigrationRegistry, CURRENT_SCHEMA_VERSION};
