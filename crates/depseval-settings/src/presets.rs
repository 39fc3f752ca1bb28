use depseval_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use depseval_types::Severity;
use depseval_types::ids::{ALL_CHECKS, CHECK_DEPS_ALLOWED_HOSTS, CHECK_RECURSEDEPS_UNKNOWN_DEP};
use std::collections::BTreeMap;

pub const DEFAULT_PROFILE: &str = "strict";

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "strict" => Ok(strict_profile()),
        "warn" => Ok(warn_profile()),
        "compat" => Ok(compat_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected strict|warn|compat)"),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks: all_checks(Severity::Error),
    }
}

fn warn_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks: all_checks(Severity::Warning),
    }
}

fn compat_profile() -> EffectiveConfig {
    // Shape errors still fail; the host and recursion policies are opt-in.
    let mut checks = all_checks(Severity::Error);
    for id in [CHECK_DEPS_ALLOWED_HOSTS, CHECK_RECURSEDEPS_UNKNOWN_DEP] {
        checks.insert(id.to_string(), CheckPolicy::off(Severity::Error));
    }

    EffectiveConfig {
        profile: "compat".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}

fn all_checks(severity: Severity) -> BTreeMap<String, CheckPolicy> {
    ALL_CHECKS
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::on(severity)))
        .collect()
}
