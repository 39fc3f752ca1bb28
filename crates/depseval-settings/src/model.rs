use depseval_types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `depseval.toml` schema v1.
///
/// Every key is optional; an empty file means the `strict` profile with no var overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepsevalConfigV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Values returned by `Var(name)` in place of the manifest's own `vars`.
    #[serde(default)]
    pub custom_vars: BTreeMap<String, CustomVar>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomVar {
    Bool(bool),
    String(String),
}

impl From<CustomVar> for Value {
    fn from(v: CustomVar) -> Self {
        match v {
            CustomVar::Bool(b) => Value::Bool(b),
            CustomVar::String(s) => Value::String(s),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
