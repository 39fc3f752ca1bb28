//! Tokenizer and parser for DEPS manifest text.
//!
//! The tree produced here is deliberately wider than what the evaluator accepts: lambdas,
//! comprehensions, subscripts, keyword arguments and compound statements all parse, so the
//! evaluator can reject them by node kind with a precise message instead of a generic syntax
//! error.
//!
//! This crate does no IO.

#![forbid(unsafe_code)]

pub mod ast;
mod error;
mod lexer;
mod parser;
mod token;

pub use error::SyntaxError;
pub use lexer::tokenize;
pub use parser::{parse_expression, parse_module};
pub use token::{Op, StrKind, Token, TokenKind};

/// Parse `source` as a manifest module (a sequence of statements).
pub fn parse(source: &str, filename: &str) -> Result<ast::Tree, SyntaxError> {
    parse_module(source, filename).map(ast::Tree::Module)
}
