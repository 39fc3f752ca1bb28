use crate::{model::DepsevalConfigV1, presets};
use anyhow::Context;
use depseval_domain::policy::{CheckPolicy, EffectiveConfig, FailOn};
use depseval_types::{Severity, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    /// `--var name=value` pairs; these win over `[custom_vars]` in the config file.
    pub vars: Vec<(String, Value)>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub custom_vars: BTreeMap<String, Value>,
}

pub fn resolve_config(
    cfg: DepsevalConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut effective = presets::preset(&profile)?;

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(|| CheckPolicy::off(Severity::Info));

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    let mut custom_vars: BTreeMap<String, Value> = cfg
        .custom_vars
        .into_iter()
        .map(|(name, v)| (name, Value::from(v)))
        .collect();
    custom_vars.extend(overrides.vars);

    Ok(ResolvedConfig {
        effective,
        custom_vars,
    })
}

/// Parse a `name=value` command-line var. `True` and `False` become booleans.
pub fn parse_var_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("invalid var {raw:?} (expected name=value)"))?;
    if name.is_empty() {
        anyhow::bail!("invalid var {raw:?} (empty name)");
    }
    let value = match value {
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        other => Value::String(other.to_string()),
    };
    Ok((name.to_string(), value))
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
