//! The `eval` use case: execute one manifest and hand back its scope.

use crate::config;
use crate::functions::execute_manifest;
use anyhow::Context;
use depseval_settings::Overrides;
use depseval_types::Scope;

#[derive(Clone, Debug)]
pub struct EvalInput<'a> {
    /// Display path of the manifest, used in diagnostics.
    pub path: &'a str,
    pub source: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

pub fn run_eval(input: EvalInput<'_>) -> anyhow::Result<Scope> {
    let resolved = config::resolve(input.config_text, input.overrides)?;
    execute_manifest(input.path, input.source, &resolved.custom_vars)
        .with_context(|| format!("evaluate {}", input.path))
}
