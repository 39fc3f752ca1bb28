use crate::{RenderableFinding, RenderableReport};

pub fn render_markdown(report: &RenderableReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str("# Depseval report\n\n");
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Manifests: {}\n- Findings: {} (emitted) / {} (total)\n\n",
        report.verdict.label(),
        summary.profile,
        summary.manifests_scanned,
        summary.findings_emitted,
        summary.findings_total
    ));

    if let Some(r) = &summary.truncated_reason {
        out.push_str(&format!("> Note: {r}\n\n"));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");
    for f in &report.findings {
        push_finding(&mut out, f);
    }
    out
}

fn push_finding(out: &mut String, f: &RenderableFinding) {
    out.push_str(&format!(
        "- [{}] `{}` / `{}`: {}",
        f.severity.tag(),
        f.check_id,
        f.code,
        f.message
    ));
    if let Some(site) = &f.site {
        match site.line {
            Some(line) => out.push_str(&format!(" (`{}`:{line})", site.manifest)),
            None => out.push_str(&format!(" (`{}`)", site.manifest)),
        }
    }
    out.push('\n');

    if let Some(value_path) = f.site.as_ref().and_then(|s| s.value_path.as_deref()) {
        out.push_str(&format!("  - value: `{value_path}`\n"));
    }
    if let Some(help) = &f.help {
        out.push_str(&format!("  - help: {help}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RenderableSeverity, RenderableSite, RenderableSummary, RenderableVerdictStatus,
    };

    fn summary(emitted: u32, total: u32, truncated_reason: Option<&str>) -> RenderableSummary {
        RenderableSummary {
            profile: "strict".to_string(),
            manifests_scanned: 1,
            findings_emitted: emitted,
            findings_total: total,
            truncated_reason: truncated_reason.map(str::to_string),
        }
    }

    #[test]
    fn renders_empty_report() {
        let report = RenderableReport {
            verdict: RenderableVerdictStatus::Pass,
            summary: summary(0, 0, None),
            findings: Vec::new(),
        };
        let md = render_markdown(&report);
        assert!(md.starts_with("# Depseval report\n"));
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("Profile: `strict`"));
        assert!(md.contains("No findings"));
    }

    #[test]
    fn renders_findings_with_site_help_and_truncation() {
        let report = RenderableReport {
            verdict: RenderableVerdictStatus::Fail,
            summary: summary(1, 2, Some("truncated")),
            findings: vec![RenderableFinding {
                severity: RenderableSeverity::Warning,
                check_id: "deps.allowed_hosts".to_string(),
                code: "disallowed_host".to_string(),
                message: "host 'evil.example' is not in allowed_hosts".to_string(),
                site: Some(RenderableSite {
                    manifest: "src/DEPS".to_string(),
                    line: Some(7),
                    value_path: Some(r#"deps["src/x"]"#.to_string()),
                }),
                help: Some("add the host to allowed_hosts".to_string()),
            }],
        };

        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("> Note: truncated"));
        assert!(md.contains("## Findings"));
        assert!(md.contains("- [WARN] `deps.allowed_hosts` / `disallowed_host`: host"));
        assert!(md.contains("(`src/DEPS`:7)\n  - value: `deps[\"src/x\"]`\n"));
        assert!(md.contains("help: add the host to allowed_hosts"));
    }

    #[test]
    fn renders_site_without_line_or_value_path() {
        let report = RenderableReport {
            verdict: RenderableVerdictStatus::Fail,
            summary: summary(1, 1, None),
            findings: vec![RenderableFinding {
                severity: RenderableSeverity::Error,
                check_id: "tool.runtime".to_string(),
                code: "runtime_error".to_string(),
                message: "boom".to_string(),
                site: Some(RenderableSite {
                    manifest: "DEPS".to_string(),
                    line: None,
                    value_path: None,
                }),
                help: None,
            }],
        };

        let md = render_markdown(&report);
        assert!(md.contains("[ERROR]"));
        assert!(md.contains("boom (`DEPS`)\n"));
        assert!(!md.contains("value:"));
        assert!(!md.contains("help:"));
    }
}
