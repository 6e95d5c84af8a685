use crate::features::retire_resource::error::RetireResourceError;
use crate::shared::ports::ResourceRepository;
use kernel::EntityId;
use std::sync::Arc;
use tracing::instrument;

pub struct RetireResourceUseCase<R: ResourceRepository> {
    repository: Arc<R>,
}

impl<R: ResourceRepository> RetireResourceUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(resource_id = %id))]
    pub async fn execute(&self, id: &EntityId) -> Result<(), RetireResourceError> {
        self.repository.retire(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::infrastructure::InMemoryResourceRepository;
    use kernel::Resource;

    #[tokio::test]
    async fn retiring_unknown_resource_fails() {
        let use_case = RetireResourceUseCase::new(Arc::new(InMemoryResourceRepository::new()));
        assert!(use_case.execute(&EntityId::from("missing")).await.is_err());
    }

    #[tokio::test]
    async fn retiring_known_resource_succeeds() {
        let repository = Arc::new(InMemoryResourceRepository::new());
        repository.upsert(Resource::new("r1", "db", "mcp")).await.unwrap();
        let use_case = RetireResourceUseCase::new(repository);
        assert!(use_case.execute(&EntityId::from("r1")).await.is_ok());
    }
}
