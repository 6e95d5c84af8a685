//! `AppError` — translates `kernel::ErrorKind` (spec.md §7) into HTTP
//! responses at the gateway's outer edge.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kernel::ErrorKind;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("server bind error")]
    ServerBind(#[from] std::io::Error),
}

impl From<ErrorKind> for AppError {
    /// `Denied`/`Timeout`/`EvaluationError` never reach this conversion as
    /// an `Err` — the pipeline resolves them into a `Decision{allow:false}`
    /// and returns `Ok`. Only pre-decision failures (credential rejection,
    /// unknown resource, audit enqueue failure) surface here.
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Unauthenticated(reason) => AppError::Unauthenticated(reason),
            ErrorKind::NotFound(reason) => AppError::NotFound(reason),
            ErrorKind::Denied(reason) => AppError::Internal(format!("unexpected denial outside evaluation: {reason}")),
            ErrorKind::Timeout => AppError::Internal("unexpected timeout outside evaluation".to_string()),
            ErrorKind::EvaluationError(reason) => AppError::Internal(format!("unexpected evaluation error outside evaluation: {reason}")),
            ErrorKind::AuditUnavailable(reason) => AppError::Internal(format!("could not persist audit: {reason}")),
            ErrorKind::Internal(reason) => AppError::Internal(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::ServerBind(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR"),
        };

        // spec.md §7: denials and authentication errors never log at error
        // severity; only internal/audit failures do.
        match &self {
            AppError::Internal(_) | AppError::ServerBind(_) => tracing::error!("{}", self),
            AppError::Unauthenticated(_) | AppError::NotFound(_) | AppError::BadRequest(_) => tracing::debug!("{}", self),
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
                "timestamp": time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_default(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
