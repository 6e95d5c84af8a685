use crate::features::upsert_resource::dto::{ResourceView, UpsertResourceCommand};
use crate::features::upsert_resource::error::UpsertResourceError;
use crate::shared::ports::ResourceRepository;
use kernel::{Resource, Sensitivity};
use std::sync::Arc;
use tracing::instrument;

pub struct UpsertResourceUseCase<R: ResourceRepository> {
    repository: Arc<R>,
}

impl<R: ResourceRepository> UpsertResourceUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, command), fields(resource_id = %command.id))]
    pub async fn execute(&self, command: UpsertResourceCommand) -> Result<ResourceView, UpsertResourceError> {
        let mut resource = Resource::new(command.id, command.name, command.protocol);
        resource.endpoint = command.endpoint;
        resource.sensitivity = Sensitivity::parse_or_critical(&command.sensitivity);
        resource.owning_teams = command.owning_teams;
        resource.authorized_teams = command.authorized_teams;

        let stored = self.repository.upsert(resource).await?;
        Ok(stored.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::infrastructure::InMemoryResourceRepository;

    #[tokio::test]
    async fn unrecognized_sensitivity_degrades_to_critical() {
        let use_case = UpsertResourceUseCase::new(Arc::new(InMemoryResourceRepository::new()));
        let view = use_case
            .execute(UpsertResourceCommand {
                id: "r1".into(),
                name: "db".into(),
                protocol: "mcp".into(),
                endpoint: "tcp://db".into(),
                sensitivity: "unknown".into(),
                owning_teams: Default::default(),
                authorized_teams: Default::default(),
            })
            .await
            .unwrap();
        assert_eq!(view.sensitivity, "critical");
    }
}
