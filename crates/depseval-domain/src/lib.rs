//! Pure manifest evaluation and policy (no IO).
//!
//! - [`eval`]: expression evaluator over the closed set of supported node kinds.
//! - [`exec`]: statement executor producing a [`Scope`](depseval_types::Scope).
//! - [`schema`]: declarative DEPS shape and its validator.
//! - [`consistency`]: expected-vs-actual scope comparison followed by schema validation.
//! - [`evaluate`]: policy checks over evaluated manifests, yielding findings and a verdict.

#![forbid(unsafe_code)]

pub mod consistency;
pub mod env;
pub mod error;
pub mod eval;
pub mod exec;
pub mod functions;
pub mod model;
pub mod ops;
pub mod policy;
pub mod report;
pub mod schema;

mod engine;
mod fingerprint;
pub mod checks;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use consistency::check;
pub use engine::evaluate;
pub use env::{EnvMode, Environment};
pub use error::{CheckFailure, ConsistencyError, EvalError, ExecError};
pub use eval::{evaluate_expr, evaluate_str, evaluate_tree};
pub use exec::{execute, execute_str, execute_tree};
pub use functions::{Callable, FunctionTable};
pub use schema::{Mismatch, MismatchKind, SchemaValidationError, validate};
