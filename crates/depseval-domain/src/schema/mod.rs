//! Structural validation of an evaluated scope against the DEPS shape.
//!
//! The validator collects every mismatch instead of stopping at the first, so policy checks can
//! report them all. Paths start at the top-level key and add `["key"]` / `[index]` steps, e.g.
//! `deps["src/foo"]` or `hooks[0]["action"]`.

mod deps;
mod shape;

pub use deps::deps_schema;
pub use shape::{Field, Shape};

use depseval_types::{Scope, Value, ids};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MismatchKind {
    TypeMismatch,
    UnknownKey,
    MissingKey,
    LengthMismatch,
}

impl MismatchKind {
    /// Finding code reported under `schema.mismatch`.
    pub fn code(self) -> &'static str {
        match self {
            MismatchKind::TypeMismatch => ids::CODE_TYPE_MISMATCH,
            MismatchKind::UnknownKey => ids::CODE_UNKNOWN_KEY,
            MismatchKind::MissingKey => ids::CODE_MISSING_KEY,
            MismatchKind::LengthMismatch => ids::CODE_LENGTH_MISMATCH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    /// Top-level key the mismatch sits under.
    pub fn root_key(&self) -> &str {
        let end = self.path.find('[').unwrap_or(self.path.len());
        &self.path[..end]
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        };
        match self.kind {
            MismatchKind::UnknownKey => write!(f, "{path}: unknown key {}", self.actual),
            MismatchKind::MissingKey => {
                write!(f, "{path}: missing required key of shape {}", self.expected)
            }
            MismatchKind::TypeMismatch | MismatchKind::LengthMismatch => {
                write!(f, "{path}: expected {}, got {}", self.expected, self.actual)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("schema validation failed: {}", join(.mismatches))]
pub struct SchemaValidationError {
    pub mismatches: Vec<Mismatch>,
}

fn join(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(Mismatch::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `scope` against the DEPS shape.
pub fn validate(scope: &Scope) -> Result<(), SchemaValidationError> {
    let mismatches = mismatches(scope);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError { mismatches })
    }
}

/// Every mismatch between `scope` and the DEPS shape, in traversal order.
pub fn mismatches(scope: &Scope) -> Vec<Mismatch> {
    let mut out = Vec::new();
    check_value(deps_schema(), &scope.to_value(), "", &mut out);
    tracing::debug!(mismatches = out.len(), "schema validated");
    out
}

/// Validate an arbitrary value against an arbitrary shape.
pub fn check_value(shape: &Shape, value: &Value, path: &str, out: &mut Vec<Mismatch>) {
    match shape {
        Shape::Str => expect_kind(matches!(value, Value::String(_)), shape, value, path, out),
        Shape::Bool => expect_kind(matches!(value, Value::Bool(_)), shape, value, path, out),
        Shape::Null => expect_kind(value.is_null(), shape, value, path, out),
        Shape::ListOf(inner) => match value {
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_value(inner, item, &index_path(path, i), out);
                }
            }
            _ => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Pair(first, second) => match value.as_sequence() {
            Some([a, b]) => {
                check_value(first, a, &index_path(path, 0), out);
                check_value(second, b, &index_path(path, 1), out);
            }
            Some(items) => out.push(Mismatch {
                kind: MismatchKind::LengthMismatch,
                path: path.to_string(),
                expected: format!("{shape} (2 elements)"),
                actual: format!("{} elements", items.len()),
            }),
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::MapOf(inner) => match value {
            Value::Dict(dict) => {
                for (k, v) in dict.iter() {
                    if !matches!(k, Value::String(_)) {
                        out.push(Mismatch {
                            kind: MismatchKind::TypeMismatch,
                            path: key_path(path, k),
                            expected: "str key".to_string(),
                            actual: describe(k),
                        });
                        continue;
                    }
                    check_value(inner, v, &key_path(path, k), out);
                }
            }
            _ => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Record(fields) => match value {
            Value::Dict(dict) => {
                for (k, v) in dict.iter() {
                    let field = k
                        .as_str()
                        .and_then(|name| fields.iter().find(|f| f.name == name));
                    match field {
                        Some(field) => check_value(&field.shape, v, &key_path(path, k), out),
                        None => out.push(Mismatch {
                            kind: MismatchKind::UnknownKey,
                            path: key_path(path, k),
                            expected: "a known key".to_string(),
                            actual: k.to_string(),
                        }),
                    }
                }
                for field in fields.iter().filter(|f| f.required) {
                    if dict.get_str(field.name).is_none() {
                        out.push(Mismatch {
                            kind: MismatchKind::MissingKey,
                            path: key_path(path, &Value::from(field.name)),
                            expected: field.shape.to_string(),
                            actual: "nothing".to_string(),
                        });
                    }
                }
            }
            _ => out.push(type_mismatch(shape, value, path)),
        },
        Shape::OneOf(alternatives) => {
            let mut attempts = Vec::with_capacity(alternatives.len());
            for alt in alternatives {
                let mut trial = Vec::new();
                check_value(alt, value, path, &mut trial);
                if trial.is_empty() {
                    return;
                }
                attempts.push((alt, trial));
            }
            // When exactly one alternative has the value's kind, its nested mismatches are the
            // useful ones; otherwise report the whole union.
            let mut candidates = attempts.into_iter().filter(|(alt, _)| accepts_kind(alt, value));
            match (candidates.next(), candidates.next()) {
                (Some((_, trial)), None) => out.extend(trial),
                _ => out.push(type_mismatch(shape, value, path)),
            }
        }
    }
}

fn accepts_kind(shape: &Shape, value: &Value) -> bool {
    match shape {
        Shape::Str => matches!(value, Value::String(_)),
        Shape::Bool => matches!(value, Value::Bool(_)),
        Shape::Null => value.is_null(),
        Shape::ListOf(_) => matches!(value, Value::List(_)),
        Shape::Pair(..) => value.as_sequence().is_some(),
        Shape::MapOf(_) | Shape::Record(_) => value.as_dict().is_some(),
        Shape::OneOf(alternatives) => alternatives.iter().any(|alt| accepts_kind(alt, value)),
    }
}

fn expect_kind(ok: bool, shape: &Shape, value: &Value, path: &str, out: &mut Vec<Mismatch>) {
    if !ok {
        out.push(type_mismatch(shape, value, path));
    }
}

fn type_mismatch(shape: &Shape, value: &Value, path: &str) -> Mismatch {
    Mismatch {
        kind: MismatchKind::TypeMismatch,
        path: path.to_string(),
        expected: shape.to_string(),
        actual: describe(value),
    }
}

/// Scalars by literal, containers by type name.
fn describe(value: &Value) -> String {
    match value {
        Value::List(_) | Value::Tuple(_) | Value::Dict(_) => value.type_name().to_string(),
        scalar => scalar.to_string(),
    }
}

fn key_path(path: &str, key: &Value) -> String {
    match (path.is_empty(), key) {
        (true, Value::String(s)) => s.clone(),
        (true, other) => format!("[{other}]"),
        (false, Value::String(s)) => format!("{path}[{s:?}]"),
        (false, other) => format!("{path}[{other}]"),
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}
