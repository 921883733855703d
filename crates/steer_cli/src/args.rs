//! CLI surface for a `steer` binary: a "typical test program" (spec §6) that
//! can run one statistical test directly or drive a schedule of them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use steer_report::ReportLevel;

#[derive(Debug, Parser)]
#[command(name = "steer", about = "STEER statistical randomness test execution engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a single registered statistical test against an entropy source.
    Run(RunArgs),
    /// Drive a schedule plan, launching one sub-process per test x profile.
    Schedule(ScheduleArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgramName {
    BlockFrequency,
    ApproximateEntropy,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Which registered plug-in to run.
    #[arg(long, value_enum)]
    pub program: ProgramName,

    /// Path to the entropy source (a raw binary bitstream).
    pub input: PathBuf,

    /// JSON parameters file: a `Value[]` array (spec §3). Cross-test
    /// parameters (bitstream_count/length, significance_level, thread_count)
    /// and the test-specific ones (e.g. block_length) both live here.
    #[arg(long)]
    pub parameters: Option<PathBuf>,

    /// Where to write the Report JSON.
    #[arg(long)]
    pub report: PathBuf,

    #[arg(long, value_enum, default_value = "summary")]
    pub report_level: CliReportLevel,

    #[arg(long, default_value = "unspecified")]
    pub entropy_source_id: String,

    #[arg(long)]
    pub schedule_id: Option<String>,

    #[arg(long)]
    pub test_conductor: Option<String>,

    #[arg(long)]
    pub test_notes: Option<String>,

    /// Worker-pool width; `auto` resolves to the host's CPU count
    /// (supplements spec §5's `thread_count` knob with a CLI convenience —
    /// the underlying shell still enforces `1..=128`).
    #[arg(long, default_value = "1")]
    pub threads: String,

    /// Emit a `tracing` progress event after each drained batch (spec §2
    /// supplement; silent by default).
    #[arg(long)]
    pub report_progress: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliReportLevel {
    Summary,
    Standard,
    Full,
}

impl From<CliReportLevel> for ReportLevel {
    fn from(level: CliReportLevel) -> Self {
        match level {
            CliReportLevel::Summary => ReportLevel::Summary,
            CliReportLevel::Standard => ReportLevel::Standard,
            CliReportLevel::Full => ReportLevel::Full,
        }
    }
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Path to a schedule plan JSON document (spec §6 "Schedule JSON").
    pub plan: PathBuf,

    /// Poll interval, in milliseconds, used while waiting on each
    /// sub-process (spec §4.6 "bounded poll loop with a caller-provided
    /// interval").
    #[arg(long, default_value_t = 50)]
    pub poll_interval_ms: u64,
}

/// Resolves `--threads auto` against the host CPU count; a literal `N`
/// parses as-is. Final bounds (`1..=128`) are enforced by the shell.
pub fn resolve_thread_count(threads: &str) -> Result<u64, String> {
    if threads.eq_ignore_ascii_case("auto") {
        Ok(num_cpus::get() as u64)
    } else {
        threads.parse::<u64>().map_err(|_| format!("invalid --threads value: {threads:?}"))
    }
}
