//! The `check` use case: execute a manifest and compare it with a hand-written expected scope.

use crate::config;
use crate::functions::{manifest_vars, standard_functions};
use anyhow::Context;
use depseval_domain::{ConsistencyError, ExecError};
use depseval_settings::Overrides;
use depseval_syntax::parse_module;
use depseval_types::{Scope, Value};

#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    pub path: &'a str,
    pub source: &'a str,
    /// Expected scope as a JSON object.
    pub expected_json: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

/// Result of a completed comparison. Evaluation failures are errors, not outcomes.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Passed(Scope),
    Failed(ConsistencyError),
}

pub fn parse_expected_scope(text: &str) -> anyhow::Result<Scope> {
    let json: serde_json::Value = serde_json::from_str(text).context("parse expected scope json")?;
    let value = Value::from_json(&json).context("convert expected scope")?;
    Scope::from_value(&value).context("expected scope must be a JSON object")
}

pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutcome> {
    let resolved = config::resolve(input.config_text, input.overrides)?;
    let expected = parse_expected_scope(input.expected_json)?;

    let module = parse_module(input.source, input.path)
        .map_err(ExecError::from)
        .with_context(|| format!("evaluate {}", input.path))?;
    let vars = manifest_vars(&module, input.path)
        .with_context(|| format!("evaluate {}", input.path))?;
    let functions = standard_functions(vars, resolved.custom_vars);

    match depseval_domain::check(input.source, input.path, &functions, &expected) {
        Ok(scope) => Ok(CheckOutcome::Passed(scope)),
        Err(ConsistencyError::Exec(e)) => {
            Err(e).with_context(|| format!("evaluate {}", input.path))
        }
        Err(other) => {
            tracing::debug!(path = input.path, error = %other, "consistency check failed");
            Ok(CheckOutcome::Failed(other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "vars = {'host': 'https://h.example'}\ndeps = {'src/a': Var('host') + '/a.git'}\n";

    fn check(expected_json: &str, source: &str) -> anyhow::Result<CheckOutcome> {
        run_check(CheckInput {
            path: "DEPS",
            source,
            expected_json,
            config_text: "",
            overrides: Overrides::default(),
        })
    }

    #[test]
    fn matching_scope_passes() {
        let expected = r#"{"vars": {"host": "https://h.example"}, "deps": {"src/a": "https://h.example/a.git"}}"#;
        let outcome = check(expected, MANIFEST).expect("check");
        assert!(matches!(outcome, CheckOutcome::Passed(scope) if scope.len() == 2));
    }

    #[test]
    fn differing_value_reports_path() {
        let expected = r#"{"vars": {"host": "https://h.example"}, "deps": {"src/a": "https://other/a.git"}}"#;
        let CheckOutcome::Failed(ConsistencyError::Mismatch(failure)) =
            check(expected, MANIFEST).expect("check")
        else {
            panic!("expected a mismatch");
        };
        assert_eq!(failure.path, r#"["deps"]["src/a"]"#);
        assert_eq!(failure.expected, Value::from("https://other/a.git"));
        assert_eq!(failure.actual, Value::from("https://h.example/a.git"));
    }

    #[test]
    fn json_array_matches_recursedeps_pair() {
        let outcome = check(
            r#"{"recursedeps": [["src/a", "DEPS.alt"], "src/b"]}"#,
            "recursedeps = [('src/a', 'DEPS.alt'), 'src/b']\n",
        )
        .expect("check");
        assert!(matches!(outcome, CheckOutcome::Passed(_)));
    }

    #[test]
    fn schema_violation_after_equal_scopes_fails() {
        let outcome = check(r#"{"bogus": "x"}"#, "bogus = 'x'\n").expect("check");
        assert!(matches!(
            outcome,
            CheckOutcome::Failed(ConsistencyError::Schema(_))
        ));
    }

    #[test]
    fn evaluation_error_is_not_an_outcome() {
        let err = check("{}", "x = 1\n").unwrap_err();
        assert_eq!(err.to_string(), "evaluate DEPS");
    }

    #[test]
    fn expected_scope_must_be_an_object() {
        let err = parse_expected_scope("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));

        let err = parse_expected_scope("{\"x\": 1.5}").unwrap_err();
        assert_eq!(err.to_string(), "convert expected scope");
    }
}
