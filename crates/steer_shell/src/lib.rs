//! The Test Shell (T): drives a single plug-in instance through its
//! lifecycle over a stream of fixed-length bitstreams (spec §4.4).
//!
//! `steer_shell` is the only crate that touches every lower layer at once:
//! it reads [`steer_report::ParameterSet`], builds a [`steer_report::Report`],
//! dispatches work through [`steer_pool::WorkerPool`], drives a
//! [`steer_plugin::StatisticalTest`], and folds the result through
//! [`steer_math`].

pub mod common;
pub mod error;
pub mod shell;
pub mod state;

pub use common::CommonData;
pub use error::{ShellError, ShellResult};
pub use shell::{run, run_with_progress, ProgressSink};
pub use state::ShellState;
