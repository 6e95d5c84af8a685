use crate::features::get_resource::error::GetResourceError;
use crate::features::upsert_resource::dto::ResourceView;
use crate::shared::ports::ResourceRepository;
use kernel::EntityId;
use std::sync::Arc;
use tracing::instrument;

pub struct GetResourceUseCase<R: ResourceRepository> {
    repository: Arc<R>,
}

impl<R: ResourceRepository> GetResourceUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(resource_id = %id))]
    pub async fn execute(&self, id: &EntityId) -> Result<ResourceView, GetResourceError> {
        let resource = self.repository.get(id).await?;
        Ok(resource.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::infrastructure::InMemoryResourceRepository;
    use kernel::Resource;

    #[tokio::test]
    async fn returns_view_for_known_resource() {
        let repository = Arc::new(InMemoryResourceRepository::new());
        repository.upsert(Resource::new("r1", "db", "mcp")).await.unwrap();
        let use_case = GetResourceUseCase::new(repository);
        let view = use_case.execute(&EntityId::from("r1")).await.unwrap();
        assert_eq!(view.name, "db");
    }
}
