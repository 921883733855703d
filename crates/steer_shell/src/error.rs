use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Core(#[from] steer_core::CoreError),

    #[error(transparent)]
    Report(#[from] steer_report::ReportError),

    #[error(transparent)]
    Math(#[from] steer_math::MathError),

    #[error(transparent)]
    Pool(#[from] steer_pool::PoolError),

    #[error(transparent)]
    Plugin(#[from] steer_plugin::PluginError),

    #[error("short read from entropy source: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("entropy source I/O error: {0}")]
    Io(String),

    #[error("worker-returned error in slot {slot}: {source}")]
    WorkerFailed { slot: usize, source: Box<ShellError> },
}

impl ShellError {
    /// The NIST-family reason code, when this error originated in a plug-in
    /// (spec §6 error taxonomy); used for CLI diagnostics only.
    pub fn reason(&self) -> Option<steer_plugin::FailureReason> {
        match self {
            ShellError::Plugin(e) => e.reason(),
            ShellError::WorkerFailed { source, .. } => source.reason(),
            _ => None,
        }
    }
}

pub type ShellResult<T> = Result<T, ShellError>;
