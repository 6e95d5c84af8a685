use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionCacheError {
    #[error("revalidation wait timed out")]
    RevalidationTimeout,
}

pub type Result<T> = std::result::Result<T, DecisionCacheError>;
