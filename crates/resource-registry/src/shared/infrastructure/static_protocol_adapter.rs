//! Static `ProtocolAdapter` — the only backend this crate ships. Real
//! protocol introspection (MCP tool listing, gRPC reflection, an OpenAPI
//! fetch) is an external collaborator selected by `Resource.protocol`
//! (spec.md §4.4); this adapter lets an operator declare capabilities
//! up front instead of discovering them live.

use crate::shared::ports::{ProtocolAdapter, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use kernel::{Capability, EntityId, Resource};

#[derive(Default)]
pub struct StaticProtocolAdapter {
    by_resource: DashMap<EntityId, Vec<Capability>>,
}

impl StaticProtocolAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&self, resource_id: impl Into<EntityId>, capabilities: Vec<Capability>) {
        self.by_resource.insert(resource_id.into(), capabilities);
    }
}

#[async_trait]
impl ProtocolAdapter for StaticProtocolAdapter {
    async fn discover_capabilities(&self, resource: &Resource) -> Result<Vec<Capability>> {
        Ok(self.by_resource.get(&resource.id).map(|entry| entry.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn declared_capabilities_are_returned() {
        let adapter = StaticProtocolAdapter::new();
        adapter.declare("r1", vec![Capability::new("cap-1", "r1", "search")]);
        let resource = Resource::new("r1", "db", "mcp");
        let found = adapter.discover_capabilities(&resource).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn undeclared_resource_returns_empty() {
        let adapter = StaticProtocolAdapter::new();
        let resource = Resource::new("r1", "db", "mcp");
        assert!(adapter.discover_capabilities(&resource).await.unwrap().is_empty());
    }
}
