//! Which checks run over the evaluated manifests, at what severity, and when a run fails.

use crate::report::SeverityCounts;
use depseval_types::{Severity, Verdict};
use std::collections::BTreeMap;

/// Lowest severity that fails the run. Errors always fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

impl FailOn {
    pub fn verdict(self, counts: &SeverityCounts) -> Verdict {
        match (counts.error, counts.warning, self) {
            (0, 0, _) => Verdict::Pass,
            (0, _, FailOn::Error) => Verdict::Warn,
            _ => Verdict::Fail,
        }
    }
}

/// Switch for one check id. A disabled check keeps its severity so a later
/// `[checks]` entry can turn it back on without restating it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
}

impl CheckPolicy {
    pub fn on(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
        }
    }

    pub fn off(severity: Severity) -> Self {
        Self {
            enabled: false,
            severity,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_findings: usize,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    /// Severity for findings of `check_id`, or `None` when the check does not run.
    pub fn severity_for(&self, check_id: &str) -> Option<Severity> {
        self.checks
            .get(check_id)
            .filter(|p| p.enabled)
            .map(|p| p.severity)
    }

    pub fn enabled_checks(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|(_, p)| p.enabled)
            .map(|(id, _)| id.as_str())
    }
}
