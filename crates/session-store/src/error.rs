use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session not found")]
    NotFound,
    #[error("refresh token reuse detected; session family revoked")]
    ReplayDetected,
}

pub type Result<T> = std::result::Result<T, SessionStoreError>;
