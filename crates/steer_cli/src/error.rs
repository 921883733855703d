//! Top-level CLI error, wrapping every lower-layer error family behind one
//! `Display` the binary prints on exit.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("cannot write {path}: {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },

    #[error("invalid parameters JSON: {0}")]
    ParametersJson(serde_json::Error),

    #[error("invalid --threads value: {0:?}")]
    InvalidThreads(String),

    #[error(transparent)]
    Shell(#[from] steer_shell::ShellError),

    #[error(transparent)]
    Sched(#[from] steer_sched::SchedError),

    #[error(transparent)]
    Core(#[from] steer_core::CoreError),

    #[error(transparent)]
    Report(#[from] steer_report::ReportError),
}

impl CliError {
    pub fn reason(&self) -> Option<steer_plugin::FailureReason> {
        match self {
            CliError::Shell(e) => e.reason(),
            _ => None,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
