use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditRecorderError {
    #[error("audit record not found: {0}")]
    NotFound(String),
    #[error("audit store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AuditRecorderError>;
