//! Regression cross-check: execute a manifest, compare the scope with a hand-written expected
//! scope, then validate it against the DEPS shape.

use crate::error::{CheckFailure, ConsistencyError};
use crate::exec::execute_str;
use crate::functions::FunctionTable;
use crate::schema::validate;
use depseval_types::{Scope, Value};

/// Execute `content` (read from `path`) and require the result to equal `expected`.
///
/// Returns the executed scope when both the comparison and schema validation pass.
pub fn check(
    content: &str,
    path: &str,
    functions: &FunctionTable,
    expected: &Scope,
) -> Result<Scope, ConsistencyError> {
    let actual = execute_str(content, functions, path)?;
    compare(&expected.to_value(), &actual.to_value(), "", path)?;
    validate(&actual)?;
    Ok(actual)
}

/// Structural comparison. Dicts must have equal key sets and sequences equal lengths. An
/// expected list also matches an actual tuple, since JSON has no tuple; everything else
/// compares by equality.
pub fn compare(
    expected: &Value,
    actual: &Value,
    var_path: &str,
    manifest: &str,
) -> Result<(), CheckFailure> {
    match (expected, actual) {
        (Value::Dict(exp), Value::Dict(act)) => {
            let mut exp_keys: Vec<&Value> = exp.keys().collect();
            let mut act_keys: Vec<&Value> = act.keys().collect();
            exp_keys.sort_by_key(|k| k.to_string());
            act_keys.sort_by_key(|k| k.to_string());
            if exp_keys != act_keys {
                return Err(failure(
                    manifest,
                    var_path,
                    Value::List(exp_keys.into_iter().cloned().collect()),
                    Value::List(act_keys.into_iter().cloned().collect()),
                ));
            }
            for (key, exp_value) in exp.iter() {
                let Some(act_value) = act.get(key) else {
                    continue;
                };
                let child = match key {
                    Value::String(s) => format!("{var_path}[\"{s}\"]"),
                    other => format!("{var_path}[{other}]"),
                };
                compare(exp_value, act_value, &child, manifest)?;
            }
            Ok(())
        }
        (Value::List(exp), Value::List(act) | Value::Tuple(act))
        | (Value::Tuple(exp), Value::Tuple(act)) => {
            if exp.len() != act.len() {
                return Err(failure(
                    manifest,
                    &format!("len({var_path})"),
                    Value::Int(exp.len() as i64),
                    Value::Int(act.len() as i64),
                ));
            }
            for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                compare(e, a, &format!("{var_path}[{i}]"), manifest)?;
            }
            Ok(())
        }
        _ if expected == actual => Ok(()),
        _ => Err(failure(manifest, var_path, expected.clone(), actual.clone())),
    }
}

fn failure(manifest: &str, path: &str, expected: Value, actual: Value) -> CheckFailure {
    CheckFailure {
        message: format!("depseval check for {manifest}: {path} expected {expected}, got {actual}"),
        path: path.to_string(),
        expected,
        actual,
    }
}
