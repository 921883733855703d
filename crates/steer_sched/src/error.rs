//! Errors raised while parsing a schedule plan or driving sub-processes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to parse schedule JSON: {0}")]
    JsonParseFailure(String),

    #[error("failed to spawn program {program:?}: {source}")]
    SpawnFailure { program: String, source: std::io::Error },

    #[error("failed to wait on program {program:?}: {source}")]
    WaitFailure { program: String, source: std::io::Error },
}

pub type SchedResult<T> = Result<T, SchedError>;
