//! Lexer and parser error types: `LexError`, `ParseError`.

use noetic_base::{SpannedError, Span};
use std::fmt;

/// An invalid character or unterminated string encountered while lexing.
#[derive(Debug, Clone)]
pub struct LexError(pub SpannedError);

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        LexError(SpannedError::new(message, span))
    }

    pub fn span(&self) -> Span {
        self.0.span
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lex error: {}", self.0)
    }
}

impl std::error::Error for LexError {}

/// An unexpected token encountered while parsing.
#[derive(Debug, Clone)]
pub struct ParseError(pub SpannedError);

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError(SpannedError::new(message, span))
    }

    pub fn span(&self) -> Span {
        self.0.span
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError(e.0)
    }
}

pub type LexResult<T> = Result<T, LexError>;
pub type ParseResult<T> = Result<T, ParseError>;
