// Path: crates/scoring/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Agent Governance Scoring
//!
//! Pure, deterministic functions mapping an agent's performance metrics
//! (and recent action history) to a trust profile, and mapping elapsed
//! time plus recent actions to an updated performance snapshot.
//!
//! Both [`score`] and [`evolve`] are free functions with no `&mut self`
//! and no I/O — the same pure-core split the consensus layer uses for
//! its quarantine accounting, where a side-effect-free function computes
//! a result and any stateful wrapper is kept strictly outside this crate.

/// Recent-action aggregation and the reputation evolution function.
pub mod evolve;
/// The trust scoring function and its context projections.
pub mod score;

pub use evolve::{evolve, ActionOutcome};
pub use score::score;
