use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendErrorKind {
    #[error("sink transport failure: {0}")]
    Transport(String),
    #[error("sink rejected payload: {0}")]
    Rejected(String),
    #[error("sink timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ForwarderError {
    #[error("unknown sink: {0}")]
    UnknownSink(String),
    #[error("circuit open for sink {0}")]
    CircuitOpen(String),
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
