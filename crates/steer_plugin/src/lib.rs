//! The plug-in ABI contract (spec §4.4, §6): the seven-function lifecycle
//! every statistical-test algorithm implements, plus two concrete plug-ins
//! (`block_frequency`, `approximate_entropy`) that exercise the Test Shell
//! end-to-end.

pub mod bits;
pub mod error;
pub mod info;
pub mod plugins;
pub mod reason;
pub mod trait_def;

pub use error::{PluginError, PluginResult};
pub use info::{InputFormat, ParameterInfo, TestInfo};
pub use plugins::{ApproximateEntropyTest, BlockFrequencyTest};
pub use reason::FailureReason;
pub use trait_def::{ExecuteContext, InitOutcome, PerBitstreamOutcome, StatisticalTest};
