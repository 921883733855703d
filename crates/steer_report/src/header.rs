//! Report header and projection strength (spec §3).

/// Projection strength: controls what a serialised [`crate::Report`] carries,
/// never the underlying truth of the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    /// Omits `parameters` and `configurations`.
    Summary,
    /// Adds `parameters`/`configurations`, without `calculations`/`metrics` bodies.
    Standard,
    /// Everything.
    Full,
}

impl ReportLevel {
    /// Unknown level strings fall back to `Summary` (spec §4.6 scheduler rule,
    /// reused here for any caller that parses a level from free text).
    pub fn parse_or_summary(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "standard" => ReportLevel::Standard,
            "full" => ReportLevel::Full,
            _ => ReportLevel::Summary,
        }
    }
}

/// Header fields carried by every Report regardless of level.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Header {
    pub test_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    pub program_name: String,
    pub program_version: String,
    pub os: String,
    pub architecture: String,
    pub entropy_source_id: String,
    /// RFC-3339 local timestamp; format is specified loosely (spec §1).
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Loosely-specified duration text (e.g. `"12.345s"`), set at Finalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub report_level: ReportLevel,
}

impl Header {
    pub fn new(
        test_name: impl Into<String>,
        program_name: impl Into<String>,
        program_version: impl Into<String>,
        os: impl Into<String>,
        architecture: impl Into<String>,
        entropy_source_id: impl Into<String>,
        started_at: impl Into<String>,
        report_level: ReportLevel,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            suite: None,
            schedule_id: None,
            program_name: program_name.into(),
            program_version: program_version.into(),
            os: os.into(),
            architecture: architecture.into(),
            entropy_source_id: entropy_source_id.into(),
            started_at: started_at.into(),
            completed_at: None,
            duration: None,
            report_level,
        }
    }
}
