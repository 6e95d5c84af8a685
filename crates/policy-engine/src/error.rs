use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PolicyEngineError {
    #[error("policy corpus failed to compile: {0}")]
    CompileError(String),

    #[error("cedar policy parse error: {0}")]
    CedarParseError(String),

    #[error("evaluation timed out")]
    Timeout,

    #[error("evaluation error: {0}")]
    EvaluationError(String),
}

pub type Result<T> = std::result::Result<T, PolicyEngineError>;
