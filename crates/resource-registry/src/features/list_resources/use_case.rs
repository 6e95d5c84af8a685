use crate::features::list_resources::error::ListResourcesError;
use crate::features::upsert_resource::dto::ResourceView;
use crate::shared::ports::ResourceRepository;
use std::sync::Arc;
use tracing::instrument;

pub struct ListResourcesUseCase<R: ResourceRepository> {
    repository: Arc<R>,
}

impl<R: ResourceRepository> ListResourcesUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, include_retired: bool) -> Result<Vec<ResourceView>, ListResourcesError> {
        let resources = self.repository.list().await?;
        Ok(resources
            .into_iter()
            .filter(|r| include_retired || !r.retired)
            .map(ResourceView::from)
            .collect())
    }
}
