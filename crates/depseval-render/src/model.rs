//! Render-side view of a report. Only what the Markdown and annotation surfaces print.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

impl RenderableSeverity {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        }
    }

    /// GitHub workflow command that raises an annotation at this severity.
    pub(crate) fn workflow_command(self) -> &'static str {
        match self {
            RenderableSeverity::Info => "notice",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

impl RenderableVerdictStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RenderableVerdictStatus::Pass => "PASS",
            RenderableVerdictStatus::Warn => "WARN",
            RenderableVerdictStatus::Fail => "FAIL",
        }
    }
}

/// Where a finding points in the evaluated manifests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSite {
    pub manifest: String,
    /// Line of the top-level assignment the offending value belongs to.
    pub line: Option<u32>,
    /// Path of the offending value inside the scope, e.g. `hooks[0]["action"]`.
    pub value_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub message: String,
    pub site: Option<RenderableSite>,
    pub help: Option<String>,
}

/// Run totals for the report header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSummary {
    pub profile: String,
    pub manifests_scanned: u32,
    pub findings_emitted: u32,
    pub findings_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub summary: RenderableSummary,
    pub findings: Vec<RenderableFinding>,
}
