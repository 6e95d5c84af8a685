//! In-memory `ResourceRepository` — the only backend this crate ships
//! (mirrors the teacher's `mem` cargo-feature in-memory storage); a durable
//! backend is an external collaborator (spec.md §1).

use crate::shared::ports::{RegistryError, Result, ResourceRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use kernel::{EntityId, Resource};

#[derive(Default)]
pub struct InMemoryResourceRepository {
    resources: DashMap<EntityId, Resource>,
}

impl InMemoryResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn upsert(&self, resource: Resource) -> Result<Resource> {
        self.resources.insert(resource.id.clone(), resource.clone());
        Ok(resource)
    }

    async fn retire(&self, id: &EntityId) -> Result<()> {
        let mut entry = self
            .resources
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if entry.retired {
            return Err(RegistryError::AlreadyRetired(id.to_string()));
        }
        entry.retired = true;
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> Result<Resource> {
        self.resources
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        Ok(self.resources.iter().map(|entry| entry.value().clone()).collect())
    }
}
