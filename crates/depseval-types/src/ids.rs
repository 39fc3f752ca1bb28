//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_SCHEMA_MISMATCH: &str = "schema.mismatch";
pub const CHECK_DEPS_ALLOWED_HOSTS: &str = "deps.allowed_hosts";
pub const CHECK_RECURSEDEPS_UNKNOWN_DEP: &str = "recursedeps.unknown_dep";

// Codes: schema.mismatch
pub const CODE_TYPE_MISMATCH: &str = "type_mismatch";
pub const CODE_UNKNOWN_KEY: &str = "unknown_key";
pub const CODE_MISSING_KEY: &str = "missing_key";
pub const CODE_LENGTH_MISMATCH: &str = "length_mismatch";

// Codes: deps.allowed_hosts
pub const CODE_DISALLOWED_HOST: &str = "disallowed_host";

// Codes: recursedeps.unknown_dep
pub const CODE_UNKNOWN_DEPENDENCY: &str = "unknown_dependency";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

/// Every policy check the domain can run, in execution order.
pub const ALL_CHECKS: &[&str] = &[
    CHECK_SCHEMA_MISMATCH,
    CHECK_DEPS_ALLOWED_HOSTS,
    CHECK_RECURSEDEPS_UNKNOWN_DEP,
];
