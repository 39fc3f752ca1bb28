//! Use case orchestration for depseval.
//!
//! This crate provides the application layer: use cases that coordinate the syntax, domain,
//! settings, and render layers. It never touches the filesystem; callers hand in manifest and
//! config text.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod config;
mod eval;
mod functions;
mod render;
mod report;
mod validate;

pub use check::{CheckInput, CheckOutcome, parse_expected_scope, run_check};
pub use config::resolve;
pub use eval::{EvalInput, run_eval};
pub use functions::{execute_manifest, manifest_vars, standard_functions};
pub use render::{render_annotations, render_markdown};
pub use report::{
    build_report, parse_report_json, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
pub use validate::{ManifestSource, ValidateInput, ValidateOutput, run_validate};
