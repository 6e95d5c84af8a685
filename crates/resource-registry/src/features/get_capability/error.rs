use crate::shared::ports::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GetCapabilityError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("resource is retired: {0}")]
    ResourceRetired(String),
    #[error("capability not found: {0} on resource {1}")]
    CapabilityNotFound(String, String),
}
