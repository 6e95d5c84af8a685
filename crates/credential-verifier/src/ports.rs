//! Collaborator ports `credential-verifier` needs but doesn't own.

use async_trait::async_trait;
use std::sync::Arc;

/// Asks the Session Store whether a bearer-carried session has been
/// revoked (spec.md §4.1 `verify_bearer` contract).
#[async_trait]
pub trait SessionLookup: Send + Sync {
    async fn is_revoked(&self, session_id: &str) -> bool;
}

#[async_trait]
impl<T: SessionLookup> SessionLookup for Arc<T> {
    async fn is_revoked(&self, session_id: &str) -> bool {
        (**self).is_revoked(session_id).await
    }
}

/// One registered API key: the salted hash to compare against and the
/// principal fields to mint on success.
#[derive(Debug, Clone)]
pub struct ApiKeyRecord {
    pub key_hash: [u8; 32],
    pub principal_id: String,
    pub display_name: String,
    pub roles: std::collections::BTreeSet<String>,
    pub teams: std::collections::BTreeSet<String>,
}

#[async_trait]
pub trait ApiKeyRegistry: Send + Sync {
    async fn lookup(&self, key_id: &str) -> Option<ApiKeyRecord>;
}

#[async_trait]
impl<T: ApiKeyRegistry> ApiKeyRegistry for Arc<T> {
    async fn lookup(&self, key_id: &str) -> Option<ApiKeyRecord> {
        (**self).lookup(key_id).await
    }
}

/// Per-principal rate limiting collaborator (spec.md §4.1: "rate-limit and
/// scope checks apply"). A permissive no-op implementation is provided for
/// tests and deployments that enforce rate limits upstream.
pub trait RateLimiter: Send + Sync {
    fn check(&self, principal_id: &str) -> bool;
}

pub struct NoOpRateLimiter;

impl RateLimiter for NoOpRateLimiter {
    fn check(&self, _principal_id: &str) -> bool {
        true
    }
}
