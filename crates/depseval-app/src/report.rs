use anyhow::Context;
use depseval_domain::report::DomainReport;
use depseval_render::{
    RenderableFinding, RenderableReport, RenderableSeverity, RenderableSite, RenderableSummary,
    RenderableVerdictStatus,
};
use depseval_types::{
    DepsevalData, DepsevalReport, Finding, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "depseval".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Wrap a domain report in the versioned envelope.
pub fn build_report(domain: DomainReport, started_at: OffsetDateTime) -> DepsevalReport {
    DepsevalReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: domain.verdict,
        findings: domain.findings,
        data: domain.data,
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<DepsevalReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse depseval report")
}

pub fn serialize_report(report: &DepsevalReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &DepsevalReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        summary: RenderableSummary {
            profile: report.data.profile.clone(),
            manifests_scanned: report.data.manifests_scanned,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        // Checks record the offending value's scope path under `data.path`.
        site: f.location.as_ref().map(|loc| RenderableSite {
            manifest: loc.path.as_str().to_string(),
            line: loc.line,
            value_path: f.data["path"].as_str().map(str::to_string),
        }),
        help: f.help.clone(),
    }
}

/// A failing report carrying a single `tool.runtime` finding.
pub fn runtime_error_report(message: &str) -> DepsevalReport {
    let now = OffsetDateTime::now_utc();
    DepsevalReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run depseval.".to_string()),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: DepsevalData {
            profile: "unknown".to_string(),
            manifests_scanned: 0,
            findings_total: 1,
            findings_emitted: 1,
            truncated_reason: None,
        },
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }

    #[test]
    fn runtime_error_report_round_trips_through_json() {
        let report = runtime_error_report("read DEPS: not found");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");

        assert_eq!(parsed.verdict, Verdict::Fail);
        assert_eq!(parsed.findings.len(), 1);
        assert_eq!(parsed.findings[0].check_id, "tool.runtime");
        assert_eq!(parsed.findings[0].message, "read DEPS: not found");
        assert_eq!(parsed.tool.name, "depseval");
    }

    #[test]
    fn rejects_foreign_schema() {
        let err = parse_report_json(r#"{"schema": "other.report.v1"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn renderable_keeps_location_and_data() {
        let report = runtime_error_report("boom");
        let renderable = to_renderable(&report);
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Fail);
        assert_eq!(renderable.findings[0].code, "runtime_error");
        assert_eq!(renderable.findings[0].site, None);
        assert_eq!(renderable.summary.profile, "unknown");
        assert_eq!(renderable.summary.findings_total, 1);
    }

    #[test]
    fn renderable_site_carries_the_value_path() {
        let mut report = runtime_error_report("boom");
        let finding = &mut report.findings[0];
        finding.location = Some(depseval_types::Location::at_line(
            depseval_types::ManifestPath::new("sub/DEPS"),
            Some(4),
        ));
        finding.data = serde_json::json!({"path": "hooks[0][\"action\"]"});

        let site = to_renderable(&report).findings[0].site.clone().expect("site");
        assert_eq!(site.manifest, "sub/DEPS");
        assert_eq!(site.line, Some(4));
        assert_eq!(site.value_path.as_deref(), Some(r#"hooks[0]["action"]"#));
    }
}
