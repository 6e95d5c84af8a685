//! Shared error taxonomy (spec §7), used by every crate that surfaces a
//! decision or a failure across a component boundary.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize)]
pub enum ErrorKind {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("denied: {0}")]
    Denied(String),

    #[error("timeout")]
    Timeout,

    #[error("evaluation_error: {0}")]
    EvaluationError(String),

    #[error("audit unavailable: {0}")]
    AuditUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// The stable, enumerated deny reason a caller sees (spec §7): never
    /// leaks sub-check detail or secrets.
    pub fn public_reason(&self) -> String {
        match self {
            Self::Unauthenticated(_) => "unauthenticated".to_string(),
            Self::NotFound(_) => "not_found".to_string(),
            Self::Denied(reason) => reason.clone(),
            Self::Timeout => "timeout".to_string(),
            Self::EvaluationError(kind) => format!("evaluation_error: {kind}"),
            Self::AuditUnavailable(_) => "internal_error".to_string(),
            Self::Internal(_) => "internal_error".to_string(),
        }
    }

    /// spec §7: denials and authentication errors are expected control
    /// flow and never log at error severity; only these three do.
    pub fn is_error_severity(&self) -> bool {
        matches!(self, Self::AuditUnavailable(_) | Self::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, ErrorKind>;
