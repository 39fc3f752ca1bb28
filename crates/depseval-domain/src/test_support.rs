use crate::exec::execute_str;
use crate::functions::FunctionTable;
use crate::model::{ManifestModel, ManifestSet};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use depseval_types::{Dict, Severity, Value};
use std::collections::BTreeMap;

pub fn s(v: &str) -> Value {
    Value::from(v)
}

pub fn dict(pairs: Vec<(&str, Value)>) -> Value {
    Value::Dict(pairs.into_iter().map(|(k, v)| (s(k), v)).collect::<Dict>())
}

pub fn list(items: Vec<Value>) -> Value {
    Value::List(items)
}

pub fn tuple(items: Vec<Value>) -> Value {
    Value::Tuple(items)
}

/// `Var` over a fixed map plus the `Str` identity, enough for most manifests in tests.
pub fn functions_with_vars(vars: Vec<(&str, &str)>) -> FunctionTable {
    let vars: BTreeMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    FunctionTable::new()
        .with("Var", move |args: &[Value]| match args {
            [Value::String(name)] => vars
                .get(name)
                .map(|v| Value::from(v.as_str()))
                .ok_or_else(|| format!("Var is not defined: {name}")),
            _ => Err("Var takes exactly one string argument".to_string()),
        })
        .with("Str", |args: &[Value]| match args {
            [v @ Value::String(_)] => Ok(v.clone()),
            _ => Err("Str takes exactly one string argument".to_string()),
        })
}

pub fn manifest_from_source(path: &str, source: &str) -> ManifestModel {
    let scope = execute_str(source, &functions_with_vars(vec![]), path)
        .expect("test manifest should execute");
    ManifestModel::new(path, scope)
}

pub fn set(manifests: Vec<ManifestModel>) -> ManifestSet {
    ManifestSet { manifests }
}

pub fn config_with_check(check_id: &str, severity: Severity) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(check_id.to_string(), CheckPolicy::on(severity));
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}

pub fn config_with_all_checks(severity: Severity) -> EffectiveConfig {
    let checks = depseval_types::ids::ALL_CHECKS
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::on(severity)))
        .collect();
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}
