//! The function table DEPS manifests are evaluated with.

use depseval_domain::exec::VARS;
use depseval_domain::{ExecError, FunctionTable, evaluate_expr, execute};
use depseval_syntax::ast::{ExprKind, Module, StmtKind};
use depseval_syntax::parse_module;
use depseval_types::{Dict, Scope, Value};
use std::collections::BTreeMap;

/// `Var(name)` and `Str(s)`.
///
/// `Var` consults `custom_vars` first, then the manifest's own `vars`.
pub fn standard_functions(
    manifest_vars: Dict,
    custom_vars: BTreeMap<String, Value>,
) -> FunctionTable {
    let mut table = str_only();
    table.insert("Var", move |args: &[Value]| match args {
        [Value::String(name)] => custom_vars
            .get(name)
            .or_else(|| manifest_vars.get_str(name))
            .cloned()
            .ok_or_else(|| format!("Var is not defined: {name}")),
        [other] => Err(format!(
            "Var() argument must be str, not {}",
            other.type_name()
        )),
        _ => Err(format!(
            "Var() takes exactly one argument ({} given)",
            args.len()
        )),
    });
    table
}

fn str_only() -> FunctionTable {
    FunctionTable::new().with("Str", |args: &[Value]| match args {
        [v @ Value::String(_)] => Ok(v.clone()),
        [other] => Err(format!(
            "Str() argument must be str, not {}",
            other.type_name()
        )),
        _ => Err(format!(
            "Str() takes exactly one argument ({} given)",
            args.len()
        )),
    })
}

/// Evaluate only the `vars` assignment of `module`.
///
/// Entries may refer to earlier entries by name. A missing or non-dict `vars` yields an empty
/// dict; the full execution and the schema report those cases.
pub fn manifest_vars(module: &Module, filename: &str) -> Result<Dict, ExecError> {
    let assignment = module.body.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::Assign { targets, value } => match targets.as_slice() {
            [target] if matches!(&target.kind, ExprKind::Name(n) if n == VARS) => Some(value),
            _ => None,
        },
        _ => None,
    });

    let Some(expr) = assignment else {
        return Ok(Dict::new());
    };

    match evaluate_expr(expr, &str_only(), filename, true)? {
        Value::Dict(vars) => Ok(vars),
        _ => Ok(Dict::new()),
    }
}

/// Parse, pre-evaluate `vars`, and execute a manifest with the standard functions.
pub fn execute_manifest(
    path: &str,
    source: &str,
    custom_vars: &BTreeMap<String, Value>,
) -> Result<Scope, ExecError> {
    let module = parse_module(source, path)?;
    let vars = manifest_vars(&module, path)?;
    let functions = standard_functions(vars, custom_vars.clone());
    execute(&module, &functions, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, custom: &[(&str, Value)]) -> Result<Scope, ExecError> {
        let custom = custom
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        execute_manifest("DEPS", source, &custom)
    }

    #[test]
    fn var_reads_manifest_vars() {
        let scope = run(
            "vars = {'host': 'https://h.example', 'url': '{host}/x'}\ndeps = {'src/a': Var('host') + '/a.git'}\n",
            &[],
        )
        .expect("execute");
        let deps = scope.get("deps").and_then(Value::as_dict).expect("deps dict");
        assert_eq!(
            deps.get_str("src/a"),
            Some(&Value::from("https://h.example/a.git"))
        );
    }

    #[test]
    fn custom_vars_take_precedence() {
        let scope = run(
            "vars = {'checkout': False}\nuse_relative_paths = Var('checkout')\n",
            &[("checkout", Value::Bool(true))],
        )
        .expect("execute");
        assert_eq!(scope.get("use_relative_paths"), Some(&Value::Bool(true)));
    }

    #[test]
    fn var_may_be_used_before_vars_is_assigned() {
        let scope = run(
            "deps = {'src/a': Var('root')}\nvars = {'root': 'https://r.example/a.git'}\n",
            &[],
        )
        .expect("execute");
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn unknown_var_is_an_error_at_the_call() {
        let err = run("deps = {\n  'src/a': Var('nope'),\n}\n", &[]).unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().starts_with("Var is not defined: nope"));
    }

    #[test]
    fn var_and_str_check_their_arguments() {
        let err = run("x = Var('a', 'b')\n", &[]).unwrap_err();
        assert!(err.to_string().contains("Var() takes exactly one argument (2 given)"));

        let err = run("x = Str(('a',))\n", &[]).unwrap_err();
        assert!(err.to_string().contains("Str() argument must be str, not tuple"));

        let scope = run("x = Str('a')\n", &[]).expect("execute");
        assert_eq!(scope.get("x"), Some(&Value::from("a")));
    }

    #[test]
    fn vars_pre_pass_accepts_str_and_self_reference() {
        let module =
            parse_module("vars = {'a': Str('x'), 'b': a + 'y'}\n", "DEPS").expect("parse");
        let vars = manifest_vars(&module, "DEPS").expect("vars");
        assert_eq!(vars.get_str("b"), Some(&Value::from("xy")));
    }

    #[test]
    fn missing_vars_is_empty() {
        let module = parse_module("deps = {}\n", "DEPS").expect("parse");
        assert!(manifest_vars(&module, "DEPS").expect("vars").is_empty());
    }
}
