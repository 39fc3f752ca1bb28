//! Shared data types for the depseval workspace.
//!
//! This crate is intentionally boring:
//! - the closed value model a manifest can produce
//! - the scope produced by executing a manifest
//! - stable string IDs and codes
//! - findings and the emitted report envelope

#![forbid(unsafe_code)]

pub mod ids;
pub mod location;
pub mod receipt;
pub mod scope;
pub mod value;

pub use location::{Location, ManifestPath};
pub use receipt::{
    DepsevalData, DepsevalReport, Finding, ReportEnvelope, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict,
};
pub use scope::Scope;
pub use value::{Dict, Value, ValueFromJsonError};
