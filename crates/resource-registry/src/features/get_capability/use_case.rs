use crate::features::get_capability::error::GetCapabilityError;
use crate::shared::ports::{CapabilityCache, ProtocolAdapter, ResourceRepository};
use kernel::{Capability, EntityId};
use std::sync::Arc;
use tracing::instrument;

/// Resolves a capability by asking the resource's protocol adapter to
/// discover it, caching the result so the same capability keeps the same
/// id across discovery passes (spec.md §4.4).
pub struct GetCapabilityUseCase<R: ResourceRepository, C: CapabilityCache, P: ProtocolAdapter> {
    repository: Arc<R>,
    cache: Arc<C>,
    protocol_adapter: Arc<P>,
}

impl<R: ResourceRepository, C: CapabilityCache, P: ProtocolAdapter> GetCapabilityUseCase<R, C, P> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, protocol_adapter: Arc<P>) -> Self {
        Self {
            repository,
            cache,
            protocol_adapter,
        }
    }

    #[instrument(skip(self), fields(resource_id = %resource_id, capability = %name))]
    pub async fn execute(&self, resource_id: &EntityId, name: &str) -> Result<Capability, GetCapabilityError> {
        let resource = self.repository.get(resource_id).await?;
        if resource.retired {
            return Err(GetCapabilityError::ResourceRetired(resource_id.to_string()));
        }

        if let Some(cached) = self.cache.get(resource_id, name).await {
            return Ok(cached);
        }

        let discovered = self
            .protocol_adapter
            .discover_capabilities(&resource)
            .await
            .map_err(GetCapabilityError::Registry)?;

        let capability = discovered
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GetCapabilityError::CapabilityNotFound(name.to_string(), resource_id.to_string()))?;

        self.cache.put(capability.clone()).await;
        Ok(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::infrastructure::{InMemoryCapabilityCache, InMemoryResourceRepository};
    use crate::shared::ports::Result as RegistryResult;
    use async_trait::async_trait;
    use kernel::Resource;

    struct FixedAdapter(Vec<Capability>);

    #[async_trait]
    impl ProtocolAdapter for FixedAdapter {
        async fn discover_capabilities(&self, _resource: &Resource) -> RegistryResult<Vec<Capability>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn resolves_and_caches_capability() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        repo.upsert(Resource::new("r1", "db", "mcp")).await.unwrap();
        let cache = Arc::new(InMemoryCapabilityCache::new());
        let adapter = Arc::new(FixedAdapter(vec![Capability::new("cap-1", "r1", "search")]));
        let use_case = GetCapabilityUseCase::new(repo, cache.clone(), adapter);

        let capability = use_case.execute(&EntityId::from("r1"), "search").await.unwrap();
        assert_eq!(capability.id, "cap-1");
        assert!(cache.get(&EntityId::from("r1"), "search").await.is_some());
    }

    #[tokio::test]
    async fn retired_resource_refuses_resolution() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        repo.upsert(Resource::new("r1", "db", "mcp")).await.unwrap();
        repo.retire(&EntityId::from("r1")).await.unwrap();
        let cache = Arc::new(InMemoryCapabilityCache::new());
        let adapter = Arc::new(FixedAdapter(vec![]));
        let use_case = GetCapabilityUseCase::new(repo, cache, adapter);

        assert!(use_case.execute(&EntityId::from("r1"), "search").await.is_err());
    }

    #[tokio::test]
    async fn unknown_capability_name_is_not_found() {
        let repo = Arc::new(InMemoryResourceRepository::new());
        repo.upsert(Resource::new("r1", "db", "mcp")).await.unwrap();
        let cache = Arc::new(InMemoryCapabilityCache::new());
        let adapter = Arc::new(FixedAdapter(vec![]));
        let use_case = GetCapabilityUseCase::new(repo, cache, adapter);

        assert!(use_case.execute(&EntityId::from("r1"), "missing").await.is_err());
    }
}
