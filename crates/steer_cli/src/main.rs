//! `steer` — CLI entrypoint for the STEER test-execution engine.
//!
//! Drives either a single plug-in through the Test Shell or a schedule
//! through the Scheduler, and writes the resulting Report JSON. This is the
//! only crate that installs a global `tracing` subscriber.

mod args;
mod error;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use args::{Cli, Command, ProgramName, RunArgs, ScheduleArgs};
use clap::Parser;
use error::{CliError, CliResult};
use steer_core::Value;
use steer_plugin::{ApproximateEntropyTest, BlockFrequencyTest, ParameterInfo, StatisticalTest, TestInfo};
use steer_report::{Header, ParameterSet};
use steer_sched::{parse_plan, run_schedule};
use steer_shell::ShellState;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(run_args) => run_single(run_args),
        Command::Schedule(schedule_args) => run_scheduled(schedule_args),
    }
}

fn run_single(run_args: RunArgs) -> ExitCode {
    match do_run(&run_args) {
        Ok(state) => {
            if state == ShellState::Error {
                eprintln!("steer: run finished in the Error state; report reflects whatever was accumulated");
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            match e.reason() {
                Some(reason) => eprintln!("steer: {e} (reason={})", reason.label()),
                None => eprintln!("steer: {e}"),
            }
            ExitCode::from(1)
        }
    }
}

fn do_run(run_args: &RunArgs) -> CliResult<ShellState> {
    let thread_count = args::resolve_thread_count(&run_args.threads).map_err(CliError::InvalidThreads)?;

    let test_info = test_info_for(run_args.program);
    let parameters_info = parameters_info_for(run_args.program);

    let parameters_from_file = match &run_args.parameters {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| CliError::ReadFile {
                path: path.clone(),
                source: e,
            })?;
            let values: Vec<Value> = serde_json::from_str(&text).map_err(CliError::ParametersJson)?;
            values
        }
        None => Vec::new(),
    };

    let mut params = ParameterSet::new(test_info.test_name, "default");
    params.parameters = parameters_from_file;
    for info in &parameters_info {
        if !params.parameters.iter().any(|v| v.name == info.name) {
            params = params.with_parameter(Value::new(
                info.name,
                info.data_type,
                info.precision,
                info.units.map(str::to_string),
                info.default,
            )?);
        }
    }
    if !params.parameters.iter().any(|v| v.name == "thread_count") {
        params = params.with_parameter(Value::new(
            "thread_count",
            steer_core::DataType::U64,
            None,
            None,
            thread_count.to_string(),
        )?);
    }

    let mut header = Header::new(
        test_info.test_name,
        test_info.program_name,
        test_info.program_version,
        std::env::consts::OS,
        std::env::consts::ARCH,
        run_args.entropy_source_id.clone(),
        format_unix_now(),
        run_args.report_level.into(),
    );
    header.suite = Some(test_info.suite.to_string());
    header.schedule_id = run_args.schedule_id.clone();

    let input = fs::File::open(&run_args.input).map_err(|e| CliError::ReadFile {
        path: run_args.input.clone(),
        source: e,
    })?;
    let source = std::io::BufReader::new(input);

    let mut progress = |tests_completed: u64, bitstream_count: u64| {
        if run_args.report_progress {
            tracing::info!(tests_completed, bitstream_count, "batch drained");
        }
    };
    let (mut report, state) = match run_args.program {
        ProgramName::BlockFrequency => steer_shell::run_with_progress(BlockFrequencyTest, params, header, source, &mut progress)?,
        ProgramName::ApproximateEntropy => {
            steer_shell::run_with_progress(ApproximateEntropyTest, params, header, source, &mut progress)?
        }
    };

    if let Some(conductor) = &run_args.test_conductor {
        report.add_attribute_to_configuration(
            0,
            Value::new("testConductor", steer_core::DataType::Utf8, None, None, conductor.clone())?,
        )?;
    }
    if let Some(notes) = &run_args.test_notes {
        report.add_attribute_to_configuration(0, Value::new("testNotes", steer_core::DataType::Utf8, None, None, notes.clone())?)?;
    }

    write_report(&run_args.report, &report)?;
    Ok(state)
}

fn test_info_for(program: ProgramName) -> TestInfo {
    match program {
        ProgramName::BlockFrequency => BlockFrequencyTest.get_test_info(),
        ProgramName::ApproximateEntropy => ApproximateEntropyTest.get_test_info(),
    }
}

fn parameters_info_for(program: ProgramName) -> Vec<ParameterInfo> {
    match program {
        ProgramName::BlockFrequency => BlockFrequencyTest.get_parameters_info(),
        ProgramName::ApproximateEntropy => ApproximateEntropyTest.get_parameters_info(),
    }
}

fn write_report(path: &Path, report: &steer_report::Report) -> CliResult<()> {
    let json = steer_report::serialize_json(report);
    let envelope = serde_json::json!({ "report": json });
    let text = serde_json::to_string_pretty(&envelope).expect("Report JSON is always serialisable");
    fs::write(path, text).map_err(|e| CliError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn run_scheduled(schedule_args: ScheduleArgs) -> ExitCode {
    match do_schedule(&schedule_args) {
        Ok(outcome) if outcome.process_failure_count == 0 => {
            println!(
                "steer: schedule complete — {} succeeded, {} failed",
                outcome.process_success_count, outcome.process_failure_count
            );
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            eprintln!(
                "steer: schedule finished with failures — {} succeeded, {} failed",
                outcome.process_success_count, outcome.process_failure_count
            );
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("steer: {e}");
            ExitCode::from(1)
        }
    }
}

fn do_schedule(schedule_args: &ScheduleArgs) -> CliResult<steer_sched::ScheduleOutcome> {
    let text = fs::read_to_string(&schedule_args.plan).map_err(|e| CliError::ReadFile {
        path: schedule_args.plan.clone(),
        source: e,
    })?;
    let plan = parse_plan(&text).map_err(CliError::from)?;
    run_schedule(&plan, Duration::from_millis(schedule_args.poll_interval_ms)).map_err(CliError::from)
}

fn format_unix_now() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", now.as_secs())
}
