use thiserror::Error;

use crate::reason::FailureReason;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Core(#[from] steer_core::CoreError),

    #[error(transparent)]
    Report(#[from] steer_report::ReportError),

    #[error(transparent)]
    Math(#[from] steer_math::MathError),

    #[error("block_length {actual} exceeds recommendedBlockLength {recommended}")]
    BlockLengthExceedsRecommended { actual: u64, recommended: u64 },
}

impl PluginError {
    /// The NIST-family reason code for a variant that has one, for internal
    /// bookkeeping and CLI diagnostics only (spec §6 error taxonomy).
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            PluginError::BlockLengthExceedsRecommended { .. } => Some(FailureReason::BlockLengthGTRecommended),
            _ => None,
        }
    }
}

pub type PluginResult<T> = Result<T, PluginError>;
