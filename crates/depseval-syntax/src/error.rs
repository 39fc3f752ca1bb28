use thiserror::Error;

/// Manifest text that could not be tokenized or parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (file {filename:?}, line {line})")]
pub struct SyntaxError {
    pub filename: String,
    pub line: u32,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(filename: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            message: message.into(),
        }
    }
}
