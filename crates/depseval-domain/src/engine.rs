use crate::checks;
use crate::model::ManifestSet;
use crate::policy::EffectiveConfig;
use crate::report::{DomainReport, SeverityCounts};
use depseval_types::{DepsevalData, Finding, Severity};
use std::cmp::Ordering;

/// Run the enabled checks over every evaluated manifest.
///
/// Findings are ordered most severe first, then by manifest site, and capped at `max_findings`;
/// totals are taken before the cap and the verdict after it.
pub fn evaluate(set: &ManifestSet, cfg: &EffectiveConfig) -> DomainReport {
    let mut findings: Vec<Finding> = Vec::new();
    checks::run_all(set, cfg, &mut findings);
    findings.sort_by(finding_order);

    let findings_total = findings.len() as u32;
    let mut truncated_reason = None;
    if findings.len() > cfg.max_findings {
        findings.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let counts = SeverityCounts::from_findings(&findings);
    let verdict = cfg.fail_on.verdict(&counts);
    tracing::debug!(
        manifests = set.manifests.len(),
        checks = ?cfg.enabled_checks().collect::<Vec<_>>(),
        findings_total,
        emitted = findings.len(),
        ?verdict,
        "policy evaluated"
    );

    DomainReport {
        verdict,
        data: DepsevalData {
            profile: cfg.profile.clone(),
            manifests_scanned: set.manifests.len() as u32,
            findings_total,
            findings_emitted: findings.len() as u32,
            truncated_reason,
        },
        findings,
        counts,
    }
}

/// Most severe first, then by manifest and assignment line; findings without a location
/// go last. Remaining ties break on check id, code and message.
pub(crate) fn finding_order(a: &Finding, b: &Finding) -> Ordering {
    order_key(a).cmp(&order_key(b))
}

fn order_key(f: &Finding) -> (u8, (bool, &str, u32), &str, &str, &str) {
    let rank = match f.severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let site = match &f.location {
        Some(l) => (false, l.path.as_str(), l.line.unwrap_or(u32::MAX)),
        None => (true, "", u32::MAX),
    };
    (
        rank,
        site,
        f.check_id.as_str(),
        f.code.as_str(),
        f.message.as_str(),
    )
}
