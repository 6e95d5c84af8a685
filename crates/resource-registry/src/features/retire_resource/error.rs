use crate::shared::ports::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetireResourceError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
