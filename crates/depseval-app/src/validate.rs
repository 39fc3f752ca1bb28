//! The `validate` use case: evaluate manifests, run schema and policy checks, produce a report.

use crate::config;
use crate::functions::execute_manifest;
use crate::report::build_report;
use anyhow::Context;
use depseval_domain::model::{ManifestModel, ManifestSet};
use depseval_settings::{Overrides, ResolvedConfig};
use depseval_types::DepsevalReport;
use rayon::prelude::*;
use time::OffsetDateTime;

/// A manifest already read by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestSource {
    pub path: String,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct ValidateInput<'a> {
    pub manifests: &'a [ManifestSource],
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct ValidateOutput {
    pub report: DepsevalReport,
    pub resolved_config: ResolvedConfig,
}

/// Manifests are executed in parallel; any evaluation failure aborts the run.
pub fn run_validate(input: ValidateInput<'_>) -> anyhow::Result<ValidateOutput> {
    let started_at = OffsetDateTime::now_utc();
    let resolved = config::resolve(input.config_text, input.overrides)?;

    let manifests = input
        .manifests
        .par_iter()
        .map(|m| {
            execute_manifest(&m.path, &m.text, &resolved.custom_vars)
                .map(|scope| ManifestModel::new(m.path.as_str(), scope))
                .with_context(|| format!("evaluate {}", m.path))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let set = ManifestSet { manifests };
    let domain = depseval_domain::evaluate(&set, &resolved.effective);

    Ok(ValidateOutput {
        report: build_report(domain, started_at),
        resolved_config: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use depseval_types::{Verdict, ids};

    fn source(path: &str, text: &str) -> ManifestSource {
        ManifestSource {
            path: path.to_string(),
            text: text.to_string(),
        }
    }

    fn validate(manifests: &[ManifestSource], config_text: &str) -> ValidateOutput {
        run_validate(ValidateInput {
            manifests,
            config_text,
            overrides: Overrides::default(),
        })
        .expect("validate")
    }

    #[test]
    fn empty_config_uses_strict_defaults() {
        let manifests = [source(
            "DEPS",
            "deps = {'src/a': 'https://chromium.googlesource.com/a.git'}\n",
        )];
        let output = validate(&manifests, "");
        assert_eq!(output.resolved_config.effective.profile, "strict");
        assert_eq!(output.report.verdict, Verdict::Pass);
        assert_eq!(output.report.schema, "depseval.report.v1");
        assert_eq!(output.report.data.manifests_scanned, 1);
    }

    #[test]
    fn unknown_key_fails_under_strict() {
        let manifests = [source("DEPS", "vars = {}\nbogus = 'x'\n")];
        let output = validate(&manifests, "");
        assert_eq!(output.report.verdict, Verdict::Fail);
        let finding = &output.report.findings[0];
        assert_eq!(finding.check_id, ids::CHECK_SCHEMA_MISMATCH);
        assert_eq!(finding.code, ids::CODE_UNKNOWN_KEY);
        assert_eq!(finding.location.as_ref().and_then(|l| l.line), Some(2));
    }

    #[test]
    fn warn_profile_downgrades_verdict() {
        let manifests = [source("DEPS", "bogus = 'x'\n")];
        let output = validate(&manifests, "profile = \"warn\"\n");
        assert_eq!(output.report.verdict, Verdict::Warn);
    }

    #[test]
    fn findings_span_manifests_in_path_order() {
        let manifests = [
            source("b/DEPS", "bogus = 'x'\n"),
            source("a/DEPS", "bogus = 'x'\n"),
        ];
        let output = validate(&manifests, "");
        let paths: Vec<&str> = output
            .report
            .findings
            .iter()
            .filter_map(|f| f.location.as_ref().map(|l| l.path.as_str()))
            .collect();
        assert_eq!(paths, vec!["a/DEPS", "b/DEPS"]);
        assert_eq!(output.report.data.manifests_scanned, 2);
    }

    #[test]
    fn evaluation_failure_is_an_error() {
        let manifests = [
            source("ok/DEPS", "deps = {}\n"),
            source("bad/DEPS", "deps = {}\ndeps = {}\n"),
        ];
        let err = run_validate(ValidateInput {
            manifests: &manifests,
            config_text: "",
            overrides: Overrides::default(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "evaluate bad/DEPS");
        assert!(format!("{err:#}").contains("overrides var \"deps\""));
    }
}
