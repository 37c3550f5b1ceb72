// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Types
//!
//! This crate is the foundational library for the agent governance
//! substrate, containing all core data structures and error enums shared
//! across the workspace.
//!
//! ## Architectural role
//!
//! As the base crate, `agentgov-types` has minimal dependencies and is
//! itself a dependency of almost every other crate in the workspace. This
//! structure prevents circular dependencies and provides a stable,
//! canonical definition for shared types like `Identity`, `LedgerEntry`,
//! `TrustProfile` and `GovernanceProfile`, and the error enums they fail
//! with.

/// Core identity data structures: `Identity`, its performance snapshot,
/// and version history.
pub mod identity;

/// Error enums shared across crate boundaries, each implementing
/// [`error::ErrorCode`] so every rejection carries a stable, machine
/// readable code alongside its human-readable message.
pub mod error;

/// The frozen, append-only ledger entry shape.
pub mod ledger;

/// Trust scoring output types: dimensions, context projections, composite.
pub mod scoring;

/// Adaptive governance and pre-execution validator types: tiers,
/// strictness, proposals, validation outcomes.
pub mod governance;
