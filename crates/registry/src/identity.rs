// Path: crates/registry/src/identity.rs
//! Identity construction and every state transition: `new`,
//! `update_performance`, `upgrade`, `verify_signature`.
//!
//! These are free functions rather than inherent methods on
//! `agentgov_types::identity::Identity` because computing a fresh
//! `trustProfile` requires `agentgov-scoring`, and `agentgov-types` must
//! stay free of that dependency to avoid a cycle (`types -> scoring ->
//! types`). This crate is the natural home: it already depends on both.

use std::sync::Arc;

use agentgov_crypto::PublicKey as CryptoPublicKey;
use agentgov_scoring::score;
use agentgov_types::error::IdentityError;
use agentgov_types::identity::{
    derive_agent_id, Identity, IdentityMetadata, PerformanceMetrics, VersionHistoryEntry,
};
use chrono::{DateTime, Utc};

const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Constructs a fresh [`Identity`].
///
/// `id` defaults to `did:agent:<hex>` derived from `public_key`; `metadata`
/// defaults to a single `IDENTITY_INITIALIZED` history entry at version
/// `1.0.0`; `performance` defaults to the normative baseline snapshot.
/// The trust profile is always (re)computed from the resulting
/// performance snapshot, never left stale.
pub fn new(
    public_key: &str,
    origin_system: &str,
    id: Option<String>,
    metadata: Option<IdentityMetadata>,
    performance: Option<PerformanceMetrics>,
    now: DateTime<Utc>,
) -> Result<Identity, IdentityError> {
    if public_key.is_empty() {
        return Err(IdentityError::MissingRequired("publicKey"));
    }
    if origin_system.is_empty() {
        return Err(IdentityError::MissingRequired("originSystem"));
    }

    let id = id.unwrap_or_else(|| derive_agent_id(&CryptoPublicKey::fingerprint_of_pem(public_key)));

    let metadata = metadata.unwrap_or_else(|| IdentityMetadata {
        creation_timestamp: now,
        identity_version: "1.0.0".to_string(),
        version_history: Arc::new(vec![VersionHistoryEntry {
            version: "1.0.0".to_string(),
            timestamp: now,
            action: "IDENTITY_INITIALIZED".to_string(),
            details: "Identity created".to_string(),
        }]),
    });

    let performance = performance.unwrap_or_else(|| PerformanceMetrics::defaults(now));
    let trust_profile = score(&performance, None, now);

    Ok(Identity {
        id,
        public_key: public_key.to_string(),
        origin_system: origin_system.to_string(),
        metadata,
        performance,
        trust_score: Some(trust_profile.composite),
        trust_profile: Some(trust_profile),
        revoked: false,
        revocation_reason: None,
        revocation_timestamp: None,
        schema_version: CURRENT_SCHEMA_VERSION,
    })
}

/// Bumps the patch component of a dotted three-component version string,
/// e.g. `"1.0.3"` -> `"1.0.4"`.
fn bump_patch(version: &str) -> String {
    let mut parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return "1.0.1".to_string();
    }
    let patch: u64 = parts[2].parse().unwrap_or(0) + 1;
    let patch_string = patch.to_string();
    parts[2] = &patch_string;
    parts.join(".")
}

/// Appends exactly one [`VersionHistoryEntry`] and bumps the patch
/// component of `identity.metadata.identity_version`, returning a new
/// [`Identity`] value. `identity` itself is left untouched.
pub fn upgrade(identity: &Identity, action: &str, details: &str, now: DateTime<Utc>) -> Identity {
    let new_version = bump_patch(&identity.metadata.identity_version);
    let mut history = (*identity.metadata.version_history).clone();
    history.push(VersionHistoryEntry {
        version: new_version.clone(),
        timestamp: now,
        action: action.to_string(),
        details: details.to_string(),
    });

    let metadata = IdentityMetadata {
        creation_timestamp: identity.metadata.creation_timestamp,
        identity_version: new_version,
        version_history: Arc::new(history),
    };

    Identity {
        metadata,
        ..identity.clone()
    }
}

/// Merges `updates` over `identity.performance`, recomputes `pnl.netProfit`
/// and the trust profile, sets `lastUpdated`, and appends a version
/// history entry describing the change — all via [`upgrade`].
pub fn update_performance(
    identity: &Identity,
    updates: PerformanceMetrics,
    reason: &str,
    now: DateTime<Utc>,
) -> Identity {
    let mut performance = updates;
    performance.pnl = performance.pnl.recomputed();
    performance.last_updated = now;

    let trust_profile = score(&performance, Some(&identity.performance), now);

    let updated = Identity {
        performance,
        trust_profile: Some(trust_profile),
        trust_score: Some(trust_profile.composite),
        ..identity.clone()
    };

    upgrade(
        &updated,
        reason,
        &format!("Metrics updated: {reason}"),
        now,
    )
}

/// Applies `transform` to a deep clone of `identity`, constructs a fresh
/// identity from the transformed fields, and appends a
/// `SCHEMA_MIGRATION` history entry.
pub fn migrate(
    identity: &Identity,
    transform: impl FnOnce(Identity) -> Identity,
    details: &str,
    now: DateTime<Utc>,
) -> Identity {
    let transformed = transform(identity.clone());
    upgrade(&transformed, "SCHEMA_MIGRATION", details, now)
}

/// Verifies an RSA-PSS/SHA-256 signature over `message` under
/// `identity.public_key`.
pub fn verify_signature(identity: &Identity, message: &[u8], signature_hex: &str) -> bool {
    CryptoPublicKey::from_pem(&identity.public_key)
        .and_then(|key| key.verify(message, signature_hex))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_pem() -> String {
        "-----BEGIN TEST KEY-----\nAAAA\n-----END TEST KEY-----\n".to_string()
    }

    #[test]
    fn new_derives_id_from_public_key_by_default() {
        let identity = new(&sample_pem(), "origin-a", None, None, None, now()).unwrap();
        let expected = derive_agent_id(&CryptoPublicKey::fingerprint_of_pem(&sample_pem()));
        assert_eq!(identity.id, expected);
        assert_eq!(identity.metadata.identity_version, "1.0.0");
        assert_eq!(identity.metadata.version_history.len(), 1);
    }

    #[test]
    fn missing_public_key_is_rejected() {
        let err = new("", "origin-a", None, None, None, now()).unwrap_err();
        assert_eq!(err, IdentityError::MissingRequired("publicKey"));
    }

    #[test]
    fn upgrade_bumps_patch_and_appends_history() {
        let identity = new(&sample_pem(), "origin-a", None, None, None, now()).unwrap();
        let upgraded = upgrade(&identity, "MANUAL", "manual bump", now());
        assert_eq!(upgraded.metadata.identity_version, "1.0.1");
        assert_eq!(upgraded.metadata.version_history.len(), 2);
    }

    #[test]
    fn update_performance_recomputes_trust_score() {
        let identity = new(&sample_pem(), "origin-a", None, None, None, now()).unwrap();
        let mut updates = identity.performance;
        updates.task_success_rate = 0.2;
        let updated = update_performance(&identity, updates, "degraded", now());
        assert!(updated.trust_score.unwrap() < identity.trust_score.unwrap());
        assert_eq!(updated.metadata.identity_version, "1.0.1");
    }
}
