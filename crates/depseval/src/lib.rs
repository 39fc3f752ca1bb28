//! Sandboxed evaluation of DEPS manifests.
//!
//! Manifests are restricted Python-syntax files made of `name = expression` statements. This
//! crate evaluates them without a general interpreter: only string literals, containers, names,
//! whitelisted calls, `+`, `%`, `or`, `and` and `not` are understood, and everything else is an
//! error naming the offending node.
//!
//! ```
//! use depseval::{FunctionTable, Value, execute_str, validate};
//!
//! let functions = FunctionTable::new();
//! let scope = execute_str(
//!     "vars = {'host': 'https://example.org'}\ndeps = {'src/a': 'https://example.org/a.git'}\n",
//!     &functions,
//!     "DEPS",
//! )
//! .unwrap();
//! assert_eq!(scope.get("deps").and_then(Value::as_dict).map(|d| d.len()), Some(1));
//! assert!(validate(&scope).is_ok());
//! ```

#![forbid(unsafe_code)]

pub use depseval_domain::{
    Callable, CheckFailure, ConsistencyError, EnvMode, Environment, EvalError, ExecError,
    FunctionTable, Mismatch, MismatchKind, SchemaValidationError, check, evaluate_expr,
    evaluate_str, evaluate_tree, execute, execute_str, execute_tree, validate,
};
pub use depseval_syntax::{SyntaxError, ast, parse, parse_expression, parse_module};
pub use depseval_types::{Dict, Scope, Value};

/// Structural comparison used by [`check`], exposed for callers that already hold both scopes.
pub use depseval_domain::consistency::compare;
