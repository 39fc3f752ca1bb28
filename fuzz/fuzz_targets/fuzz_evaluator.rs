//! Fuzz target for the expression evaluator and statement executor.
//!
//! Goal: executing a manifest and validating its scope should **never panic**, whatever the
//! source text and whatever the `Var` table returns.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluator
//! ```

#![no_main]

use arbitrary::Arbitrary;
use depseval_domain::{FunctionTable, evaluate_str, execute_str, validate};
use depseval_types::Value;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
struct EvalInput {
    /// Manifest source text.
    source: String,
    /// Values `Var(name)` resolves to.
    vars: BTreeMap<String, String>,
    /// Also evaluate `source` as a lone expression with self-referencing dicts.
    expose_vars: bool,
}

fuzz_target!(|input: EvalInput| {
    if input.source.len() > 16 * 1024 || input.vars.len() > 32 {
        return;
    }

    let vars = input.vars;
    let functions = FunctionTable::new().with("Var", move |args: &[Value]| match args {
        [Value::String(name)] => vars
            .get(name)
            .map(|v| Value::from(v.as_str()))
            .ok_or_else(|| format!("Var is not defined: {name}")),
        _ => Err("Var takes one string".to_string()),
    });

    // Should never panic - errors are fine
    if let Ok(scope) = execute_str(&input.source, &functions, "<fuzz>") {
        let _ = validate(&scope);
    }
    let _ = evaluate_str(&input.source, &functions, "<fuzz>", input.expose_vars);
});
