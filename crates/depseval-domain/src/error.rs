use crate::schema::SchemaValidationError;
use depseval_syntax::SyntaxError;
use depseval_types::Value;

/// An expression could not be evaluated: unsupported node, bad call shape, unknown name, or an
/// operand type combination with no meaning.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (file {filename:?}, line {line})")]
pub struct EvalError {
    pub filename: String,
    pub line: u32,
    pub message: String,
}

impl EvalError {
    pub fn new(filename: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl From<SyntaxError> for EvalError {
    fn from(err: SyntaxError) -> Self {
        Self {
            filename: err.filename,
            line: err.line,
            message: err.message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// A statement or tree shape other than a flat list of single-name assignments.
    #[error("{message} (file {filename:?}, line {line})")]
    Unsupported {
        filename: String,
        line: u32,
        message: String,
    },

    #[error("invalid assignment: overrides var {name:?} (file {filename:?}, line {line})")]
    DuplicateAssignment {
        filename: String,
        line: u32,
        name: String,
    },
}

impl ExecError {
    pub fn line(&self) -> u32 {
        match self {
            ExecError::Syntax(e) => e.line,
            ExecError::Eval(e) => e.line,
            ExecError::Unsupported { line, .. } | ExecError::DuplicateAssignment { line, .. } => {
                *line
            }
        }
    }
}

/// Expected and actual scopes differ at `path`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CheckFailure {
    pub message: String,
    pub path: String,
    pub expected: Value,
    pub actual: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Mismatch(#[from] CheckFailure),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}
