// Path: crates/types/src/scoring.rs
//! Output shapes produced by the trust scoring pipeline.
//!
//! These are pure data; the scoring computation itself lives in
//! `agentgov-scoring`, which depends on this crate rather than the other
//! way around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six trust dimensions, each clamped to `[0,1]` and rounded to four
/// decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustDimensions {
    /// `0.6*uptime + 0.4*consistency`.
    pub reliability: f64,
    /// `0.3*clamp(roi/100) + 0.7*budgetEfficiency`.
    pub efficiency: f64,
    /// `0.7*cooperationScore + 0.3*informationSharingScore`.
    pub cooperation: f64,
    /// `0.8*max(0, 1-0.2*policyViolations) + 0.2*complianceHistory`.
    pub compliance: f64,
    /// `(1-riskExposure)*S`, `S` penalizing a worsening risk trend.
    pub risk_safety: f64,
    /// `0.8*taskSuccessRate + 0.2*taskComplexityScore`.
    pub competence: f64,
}

/// The five named, domain-specialized linear projections of
/// [`TrustDimensions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustContexts {
    /// `0.6*efficiency + 0.3*riskSafety + 0.1*compliance`.
    pub financial: f64,
    /// `0.7*cooperation + 0.2*reliability + 0.1*competence`.
    pub collaborative: f64,
    /// `0.7*compliance + 0.2*riskSafety + 0.1*reliability`.
    pub compliance: f64,
    /// `0.6*competence + 0.3*efficiency + 0.1*reliability`.
    pub technical: f64,
    /// `0.5*compliance + 0.4*riskSafety + 0.1*reliability`.
    pub security: f64,
}

/// Non-normative bookkeeping attached to a scoring result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringMetadata {
    /// How many performance-metric data points contributed to this result
    /// (`2` when history was supplied, `1` otherwise).
    pub data_points: u32,
    /// The scoring algorithm version that produced this result.
    pub engine_version: &'static str,
}

/// The complete output of a single trust scoring computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustProfile {
    /// Weighted average of the six dimensions; weights sum to `1.0`.
    pub composite: f64,
    /// The six trust dimensions.
    pub dimensions: TrustDimensions,
    /// The five named context projections.
    pub contexts: TrustContexts,
    /// When this result was computed.
    pub timestamp: DateTime<Utc>,
    /// Non-normative computation bookkeeping.
    pub metadata: ScoringMetadata,
}

/// The name of a [`TrustContexts`] projection, used wherever a caller may
/// select a context instead of the composite score (tiering, the
/// validator's reserved `context` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringContext {
    /// The financial context projection.
    Financial,
    /// The collaborative context projection.
    Collaborative,
    /// The compliance context projection.
    Compliance,
    /// The technical context projection.
    Technical,
    /// The security context projection.
    Security,
}

impl TrustContexts {
    /// Selects the named projection's value.
    pub fn get(&self, context: ScoringContext) -> f64 {
        match context {
            ScoringContext::Financial => self.financial,
            ScoringContext::Collaborative => self.collaborative,
            ScoringContext::Compliance => self.compliance,
            ScoringContext::Technical => self.technical,
            ScoringContext::Security => self.security,
        }
    }
}

impl std::str::FromStr for ScoringContext {
    type Err = crate::error::GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "financial" => Ok(Self::Financial),
            "collaborative" => Ok(Self::Collaborative),
            "compliance" => Ok(Self::Compliance),
            "technical" => Ok(Self::Technical),
            "security" => Ok(Self::Security),
            other => Err(crate::error::GovernanceError::UnknownContext(
                other.to_string(),
            )),
        }
    }
}
