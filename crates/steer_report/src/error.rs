use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ReportError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("required handle or value was absent: {0}")]
    NullPointer(String),

    #[error(transparent)]
    Core(#[from] steer_core::CoreError),

    #[error("json parse failure: {0}")]
    JsonParseFailure(String),

    #[error("expected JSON tag not found: {0}")]
    JsonTagNotFound(String),
}

pub type ReportResult<T> = Result<T, ReportError>;
