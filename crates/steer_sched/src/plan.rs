//! Schedule plan JSON (spec §6 "Schedule JSON (logical)").
//!
//! `{ "schedule": { "scheduleId"?, "testConductor"?, "testNotes"?,
//! "reportLevel"?, "reportProgress"?, "tests": [ { "programName",
//! "profiles": [ {"profileId", <file-list or directory form>} ] } ] } }`.

use serde::Deserialize;
use steer_report::ReportLevel;

use crate::error::{SchedError, SchedResult};

#[derive(Clone, Debug, Deserialize)]
struct PlanEnvelope {
    schedule: Plan,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Plan {
    #[serde(rename = "scheduleId", default)]
    pub schedule_id: Option<String>,
    #[serde(rename = "testConductor", default)]
    pub test_conductor: Option<String>,
    #[serde(rename = "testNotes", default)]
    pub test_notes: Option<String>,
    #[serde(rename = "reportLevel", default)]
    report_level: Option<String>,
    #[serde(rename = "reportProgress", default)]
    pub report_progress: Option<bool>,
    pub tests: Vec<PlannedTest>,
}

impl Plan {
    /// Unknown/absent level strings default to Summary (spec §4.6).
    pub fn report_level(&self) -> ReportLevel {
        match &self.report_level {
            Some(s) => ReportLevel::parse_or_summary(s),
            None => ReportLevel::Summary,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlannedTest {
    #[serde(rename = "programName")]
    pub program_name: String,
    pub profiles: Vec<Profile>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    FileList {
        #[serde(rename = "profileId")]
        profile_id: String,
        input: String,
        #[serde(default)]
        parameters: Option<String>,
        report: String,
    },
    Directory {
        #[serde(rename = "profileId")]
        profile_id: String,
        #[serde(rename = "inputsDirectory")]
        inputs_directory: String,
        #[serde(rename = "parametersDirectory", default)]
        parameters_directory: Option<String>,
        #[serde(rename = "reportsDirectory")]
        reports_directory: String,
    },
}

impl Profile {
    pub fn profile_id(&self) -> &str {
        match self {
            Profile::FileList { profile_id, .. } => profile_id,
            Profile::Directory { profile_id, .. } => profile_id,
        }
    }
}

/// Parses a schedule document, rejecting a missing/malformed `schedule`
/// envelope or an empty `tests` list.
pub fn parse_plan(json: &str) -> SchedResult<Plan> {
    let envelope: PlanEnvelope = serde_json::from_str(json).map_err(|e| SchedError::JsonParseFailure(e.to_string()))?;
    if envelope.schedule.tests.is_empty() {
        return Err(SchedError::InvalidArgument("schedule has no tests".into()));
    }
    Ok(envelope.schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_list_and_directory_profiles() {
        let json = r#"{
            "schedule": {
                "scheduleId": "run-1",
                "testConductor": "alice",
                "tests": [
                    {
                        "programName": "block_frequency",
                        "profiles": [
                            {"profileId": "p1", "input": "in.bin", "report": "out.json"},
                            {"profileId": "p2", "inputsDirectory": "in/", "reportsDirectory": "out/"}
                        ]
                    }
                ]
            }
        }"#;
        let plan = parse_plan(json).unwrap();
        assert_eq!(plan.schedule_id.as_deref(), Some("run-1"));
        assert_eq!(plan.report_level(), ReportLevel::Summary);
        assert_eq!(plan.tests[0].profiles.len(), 2);
        assert_eq!(plan.tests[0].profiles[0].profile_id(), "p1");
        assert_eq!(plan.tests[0].profiles[1].profile_id(), "p2");
    }

    #[test]
    fn unknown_report_level_defaults_to_summary() {
        let json = r#"{"schedule": {"reportLevel": "bogus", "tests": [
            {"programName": "x", "profiles": [{"profileId": "p", "input": "i", "report": "r"}]}
        ]}}"#;
        let plan = parse_plan(json).unwrap();
        assert_eq!(plan.report_level(), ReportLevel::Summary);
    }

    #[test]
    fn empty_tests_is_rejected() {
        let json = r#"{"schedule": {"tests": []}}"#;
        assert!(parse_plan(json).is_err());
    }
}
