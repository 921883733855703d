use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("gamma function evaluation failed: {0}")]
    GammaFunctionFailed(String),
}

pub type MathResult<T> = Result<T, MathError>;
