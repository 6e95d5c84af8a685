//! In-memory `ApiKeyRegistry` — the only backend this crate ships, mirroring
//! `resource-registry`'s `InMemoryResourceRepository`; a durable backend
//! (secrets manager, database) is an external collaborator (spec.md §1).

use crate::ports::{ApiKeyRecord, ApiKeyRegistry};
use async_trait::async_trait;
use dashmap::DashMap;
use ring::digest;

#[derive(Default)]
pub struct InMemoryApiKeyRegistry {
    keys: DashMap<String, ApiKeyRecord>,
}

impl InMemoryApiKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key_id` against a pre-hashed secret. Callers that hold a
    /// plaintext secret should use `register_plaintext` instead.
    pub fn register(&self, key_id: impl Into<String>, record: ApiKeyRecord) {
        self.keys.insert(key_id.into(), record);
    }

    pub fn register_plaintext(
        &self,
        key_id: impl Into<String>,
        secret: &str,
        principal_id: impl Into<String>,
        display_name: impl Into<String>,
        roles: std::collections::BTreeSet<String>,
        teams: std::collections::BTreeSet<String>,
    ) {
        let hash = digest::digest(&digest::SHA256, secret.as_bytes());
        let mut key_hash = [0u8; 32];
        key_hash.copy_from_slice(hash.as_ref());
        self.register(
            key_id,
            ApiKeyRecord {
                key_hash,
                principal_id: principal_id.into(),
                display_name: display_name.into(),
                roles,
                teams,
            },
        );
    }

    pub fn revoke(&self, key_id: &str) {
        self.keys.remove(key_id);
    }
}

#[async_trait]
impl ApiKeyRegistry for InMemoryApiKeyRegistry {
    async fn lookup(&self, key_id: &str) -> Option<ApiKeyRecord> {
        self.keys.get(key_id).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn registered_key_round_trips() {
        let registry = InMemoryApiKeyRegistry::new();
        registry.register_plaintext("key1", "secret", "svc1", "svc", BTreeSet::new(), BTreeSet::new());
        let record = registry.lookup("key1").await.unwrap();
        assert_eq!(record.principal_id, "svc1");
    }

    #[tokio::test]
    async fn unregistered_key_is_absent() {
        let registry = InMemoryApiKeyRegistry::new();
        assert!(registry.lookup("missing").await.is_none());
    }

    #[tokio::test]
    async fn revoked_key_is_absent() {
        let registry = InMemoryApiKeyRegistry::new();
        registry.register_plaintext("key1", "secret", "svc1", "svc", BTreeSet::new(), BTreeSet::new());
        registry.revoke("key1");
        assert!(registry.lookup("key1").await.is_none());
    }
}
