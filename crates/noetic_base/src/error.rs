//! Error types with source location tracking.
//!
//! Lex and parse errors in noetic carry a [`Span`] indicating where in the
//! source text the error occurred.
//!
//! # Example
//!
//! ```
//! use noetic_base::{SpannedError, Span, Result};
//!
//! fn parse_arity(s: &str) -> Result<usize> {
//!     s.parse().map_err(|_| SpannedError::new(
//!         format!("invalid arity: '{}'", s),
//!         Span::new(0, s.len()),
//!     ))
//! }
//!
//! let err = parse_arity("abc").unwrap_err();
//! assert!(err.to_string().contains("invalid arity"));
//! ```

use crate::span::Span;
use std::fmt;

/// An error annotated with its source location.
#[derive(Debug, Clone)]
pub struct SpannedError {
    /// Human-readable error description.
    pub message: String,
    /// Location in source where the error occurred.
    pub span: Span,
}

impl SpannedError {
    /// Creates an error with the given message and source location.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;
