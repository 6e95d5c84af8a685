//! Keeps capability ids stable across discovery passes (spec.md §4.4).

use crate::shared::ports::CapabilityCache;
use async_trait::async_trait;
use dashmap::DashMap;
use kernel::{Capability, EntityId};

#[derive(Default)]
pub struct InMemoryCapabilityCache {
    by_resource_and_name: DashMap<(EntityId, String), Capability>,
}

impl InMemoryCapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityCache for InMemoryCapabilityCache {
    async fn get(&self, resource_id: &EntityId, name: &str) -> Option<Capability> {
        self.by_resource_and_name.get(&(resource_id.clone(), name.to_string())).map(|e| e.clone())
    }

    async fn put(&self, capability: Capability) {
        self.by_resource_and_name
            .insert((capability.resource_id.clone(), capability.name.clone()), capability);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::Capability;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let cache = InMemoryCapabilityCache::new();
        let cap = Capability::new("cap-1", "r1", "search");
        cache.put(cap.clone()).await;
        let found = cache.get(&EntityId::from("r1"), "search").await.unwrap();
        assert_eq!(found.id, "cap-1");
    }

    #[tokio::test]
    async fn distinct_resources_do_not_collide_on_name() {
        let cache = InMemoryCapabilityCache::new();
        cache.put(Capability::new("cap-1", "r1", "search")).await;
        cache.put(Capability::new("cap-2", "r2", "search")).await;
        assert_eq!(cache.get(&EntityId::from("r1"), "search").await.unwrap().id, "cap-1");
        assert_eq!(cache.get(&EntityId::from("r2"), "search").await.unwrap().id, "cap-2");
    }
}
