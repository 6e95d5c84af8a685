//! Collaborator ports shared by every `resource-registry` feature.

use async_trait::async_trait;
use kernel::{Capability, EntityId, Resource};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("resource already retired: {0}")]
    AlreadyRetired(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn upsert(&self, resource: Resource) -> Result<Resource>;
    async fn retire(&self, id: &EntityId) -> Result<()>;
    async fn get(&self, id: &EntityId) -> Result<Resource>;
    async fn list(&self) -> Result<Vec<Resource>>;
}

#[async_trait]
impl<T: ResourceRepository> ResourceRepository for Arc<T> {
    async fn upsert(&self, resource: Resource) -> Result<Resource> {
        (**self).upsert(resource).await
    }

    async fn retire(&self, id: &EntityId) -> Result<()> {
        (**self).retire(id).await
    }

    async fn get(&self, id: &EntityId) -> Result<Resource> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        (**self).list().await
    }
}

/// Capability discovery collaborator, named by spec.md §4.4 but left
/// unimplemented against any real backend protocol.
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    async fn discover_capabilities(&self, resource: &Resource) -> Result<Vec<Capability>>;
}

#[async_trait]
impl<T: ProtocolAdapter> ProtocolAdapter for Arc<T> {
    async fn discover_capabilities(&self, resource: &Resource) -> Result<Vec<Capability>> {
        (**self).discover_capabilities(resource).await
    }
}

/// Caches capability ids across discovery passes so a capability keeps the
/// same id as long as the backend reports the same name (spec.md §4.4
/// invariant).
#[async_trait]
pub trait CapabilityCache: Send + Sync {
    async fn get(&self, resource_id: &EntityId, name: &str) -> Option<Capability>;
    async fn put(&self, capability: Capability);
}

#[async_trait]
impl<T: CapabilityCache> CapabilityCache for Arc<T> {
    async fn get(&self, resource_id: &EntityId, name: &str) -> Option<Capability> {
        (**self).get(resource_id, name).await
    }

    async fn put(&self, capability: Capability) {
        (**self).put(capability).await
    }
}
