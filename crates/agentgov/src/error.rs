// Path: crates/agentgov/src/error.rs
//! The facade's unified error type: every lower-level error this crate
//! surfaces, widened into one enum so callers only need one `match`.

use agentgov_types::error::{ErrorCode, GovernanceError, IdentityError, LedgerError};
use thiserror::Error;

/// Errors surfaced by [`crate::AgentGovernance`]'s public operations.
#[derive(Error, Debug)]
pub enum AgentGovernanceError {
    /// An identity-lifecycle operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// An activity-ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// A governance configuration lookup failed.
    #[error(transparent)]
    Governance(#[from] GovernanceError),
}

impl ErrorCode for AgentGovernanceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Identity(inner) => inner.code(),
            Self::Ledger(inner) => inner.code(),
            Self::Governance(inner) => inner.code(),
        }
    }
}
