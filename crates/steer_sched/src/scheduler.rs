//! Launches one sub-process per test x profile and polls it to completion
//! (spec §4.6).

use std::process::{Child, Command};
use std::time::Duration;

use crate::error::{SchedError, SchedResult};
use crate::plan::{Plan, Profile};

/// Outcome of running every test x profile pairing in a [`Plan`].
#[derive(Clone, Debug, Default)]
pub struct ScheduleOutcome {
    pub process_success_count: u64,
    pub process_failure_count: u64,
    pub runs: Vec<ProcessRun>,
}

#[derive(Clone, Debug)]
pub struct ProcessRun {
    pub program_name: String,
    pub profile_id: String,
    pub exit_code: Option<i32>,
    pub succeeded: bool,
}

/// Builds the argument list for one profile, following the "typical test
/// program" CLI surface of spec §6.
fn args_for(plan: &Plan, profile: &Profile) -> Vec<String> {
    let mut args = Vec::new();
    let level_str = match plan.report_level() {
        steer_report::ReportLevel::Summary => "summary",
        steer_report::ReportLevel::Standard => "standard",
        steer_report::ReportLevel::Full => "full",
    };
    args.push("--report-level".to_string());
    args.push(level_str.to_string());
    if let Some(id) = &plan.schedule_id {
        args.push("--schedule-id".to_string());
        args.push(id.clone());
    }
    if let Some(conductor) = &plan.test_conductor {
        args.push("--test-conductor".to_string());
        args.push(conductor.clone());
    }
    if let Some(notes) = &plan.test_notes {
        args.push("--test-notes".to_string());
        args.push(notes.clone());
    }
    match profile {
        Profile::FileList { input, parameters, report, .. } => {
            args.push(input.clone());
            if let Some(p) = parameters {
                args.push("--parameters".to_string());
                args.push(p.clone());
            }
            args.push("--report".to_string());
            args.push(report.clone());
        }
        Profile::Directory {
            inputs_directory,
            parameters_directory,
            reports_directory,
            ..
        } => {
            args.push("--inputs-directory".to_string());
            args.push(inputs_directory.clone());
            if let Some(d) = parameters_directory {
                args.push("--parameters-directory".to_string());
                args.push(d.clone());
            }
            args.push("--reports-directory".to_string());
            args.push(reports_directory.clone());
        }
    }
    args
}

/// Waits on `child` using a bounded poll loop at `poll_interval`, returning
/// its exit code once it has terminated.
fn poll_to_completion(mut child: Child, program_name: &str, poll_interval: Duration) -> SchedResult<Option<i32>> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status.code()),
            Ok(None) => std::thread::sleep(poll_interval),
            Err(e) => {
                return Err(SchedError::WaitFailure {
                    program: program_name.to_string(),
                    source: e,
                })
            }
        }
    }
}

/// Runs every test x profile pairing in `plan` sequentially, launching
/// `programName` as a sub-process for each profile and waiting on it via a
/// bounded poll loop at `poll_interval` (spec §4.6).
pub fn run_schedule(plan: &Plan, poll_interval: Duration) -> SchedResult<ScheduleOutcome> {
    let mut outcome = ScheduleOutcome::default();
    for planned_test in &plan.tests {
        for profile in &planned_test.profiles {
            let args = args_for(plan, profile);
            let child = Command::new(&planned_test.program_name)
                .args(&args)
                .spawn()
                .map_err(|e| SchedError::SpawnFailure {
                    program: planned_test.program_name.clone(),
                    source: e,
                })?;

            let exit_code = poll_to_completion(child, &planned_test.program_name, poll_interval)?;
            let succeeded = exit_code == Some(0);
            if succeeded {
                outcome.process_success_count += 1;
            } else {
                outcome.process_failure_count += 1;
                tracing::warn!(
                    program = %planned_test.program_name,
                    profile = %profile.profile_id(),
                    exit_code = ?exit_code,
                    "sub-process did not exit successfully"
                );
            }
            outcome.runs.push(ProcessRun {
                program_name: planned_test.program_name.clone(),
                profile_id: profile.profile_id().to_string(),
                exit_code,
                succeeded,
            });
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parse_plan;

    fn plan_running(program_name: &str, args: &str) -> Plan {
        let json = format!(
            r#"{{"schedule": {{"tests": [
                {{"programName": "{program_name}", "profiles": [
                    {{"profileId": "p1", "input": "{args}", "report": "out.json"}}
                ]}}
            ]}}}}"#
        );
        parse_plan(&json).unwrap()
    }

    #[test]
    fn successful_process_is_tallied_as_success() {
        let plan = plan_running("true", "ignored");
        let outcome = run_schedule(&plan, Duration::from_millis(5)).unwrap();
        assert_eq!(outcome.process_success_count, 1);
        assert_eq!(outcome.process_failure_count, 0);
        assert_eq!(outcome.runs[0].exit_code, Some(0));
    }

    #[test]
    fn failing_process_is_tallied_as_failure() {
        let plan = plan_running("false", "ignored");
        let outcome = run_schedule(&plan, Duration::from_millis(5)).unwrap();
        assert_eq!(outcome.process_success_count, 0);
        assert_eq!(outcome.process_failure_count, 1);
        assert_eq!(outcome.runs[0].exit_code, Some(1));
    }

    #[test]
    fn missing_program_is_a_spawn_failure() {
        let plan = plan_running("this-program-does-not-exist-steer", "ignored");
        let err = run_schedule(&plan, Duration::from_millis(5)).unwrap_err();
        assert!(matches!(err, SchedError::SpawnFailure { .. }));
    }
}
