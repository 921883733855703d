//! The seven-function plug-in lifecycle contract (spec §4.4, §6).
//!
//! The shell owns `State` opaquely: it is produced by `init_test`, threaded
//! through every later call, and dropped when the shell returns. A plug-in
//! never touches the Report directly from `execute_test` (that call runs on
//! a worker thread); it only gets report access inside `finalize_test`,
//! which the shell always calls on its own thread after the drain barrier
//! (spec §5 "The Test Shell is the only thread that touches the Report").

use steer_core::{Criterion, Value, ValueSet};
use steer_report::{ParameterSet, Report};

use crate::error::PluginResult;
use crate::info::{ParameterInfo, TestInfo};

/// Output of `init_test`: the plug-in's private state plus the
/// `buffer_size` (in bytes) the shell must read per bitstream.
pub struct InitOutcome<S> {
    pub state: S,
    pub buffer_size: usize,
}

/// What the shell hands a plug-in for one bitstream (spec §4.4
/// `execute_test(state, bitstream_id, buffer, buf_size, bytes, zeros, ones)`).
pub struct ExecuteContext<'a> {
    pub bitstream_id: u64,
    pub buffer: &'a [u8],
    pub zeros: u64,
    pub ones: u64,
}

/// What a worker hands back to the shell for folding into one Test
/// (spec §4.3: workers write into pre-reserved slots, never the Report).
pub struct PerBitstreamOutcome {
    pub calculations: Vec<Value>,
    pub calculation_sets: Vec<ValueSet>,
    pub criteria: Vec<Criterion>,
}

/// The per-test algorithm API the Test Shell drives through a fixed
/// lifecycle (spec §4.4). Implementors hold no global mutable state; the
/// shell's `Common` data is threaded in explicitly via `params`/`report`
/// rather than through a `gCommonData`-style global (spec §9).
pub trait StatisticalTest: Send + Sync {
    /// Opaque private state, produced by `init_test`. Must be `Send + Sync`
    /// so the shell can share one instance read-only across worker threads
    /// during Streaming; the shell regains exclusive ownership before
    /// calling `finalize_test`.
    type State: Send + Sync;

    fn get_test_info(&self) -> TestInfo;
    fn get_parameters_info(&self) -> Vec<ParameterInfo>;

    fn init_test(&self, params: &ParameterSet) -> PluginResult<InitOutcome<Self::State>>;

    fn get_configuration_count(&self, state: &Self::State) -> u32;

    /// Called once per Configuration before Streaming begins, so the
    /// plug-in can record which `configuration_id` its later
    /// `finalize_test` call should write into.
    fn set_report(&self, state: &mut Self::State, configuration_id: u64);

    /// Runs on a worker thread against one slot's buffer; must not touch
    /// the Report.
    fn execute_test(&self, state: &Self::State, ctx: ExecuteContext<'_>) -> PluginResult<PerBitstreamOutcome>;

    /// Runs on the shell thread after the end-of-stream drain; rolls
    /// per-Configuration aggregates (metrics, criteria) into `report`.
    fn finalize_test(
        &self,
        state: &mut Self::State,
        report: &mut Report,
        configuration_id: u64,
        supplied_bitstream_count: u64,
    ) -> PluginResult<()>;
}
