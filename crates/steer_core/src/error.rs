//! Shared error taxonomy for the value model.
//!
//! Mirrors the stable error-label set of spec §6: framework failures carry
//! one of these variants; a failing statistical criterion never does (that
//! is recorded as a [`crate::Criterion`] instead).

use thiserror::Error;

/// Errors raised by [`crate::Value`] / [`crate::ValueSet`] construction and parsing.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("value out of range for its declared type: {0}")]
    OutOfRange(String),

    #[error("required handle or value was absent: {0}")]
    NullPointer(String),

    #[error("empty string where a non-empty value was required: {0}")]
    EmptyString(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
