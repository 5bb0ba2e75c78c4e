//! # noetic-syntax
//!
//! Lexer and parser turning source text into a [`noetic_term::Program`].

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{LexError, ParseError};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

use noetic_base::Interner;
use noetic_term::Program;

/// Lexes and parses `source` in one call, the common case for the driver.
pub fn parse_program(source: &str, interner: &mut Interner) -> Result<Program, ParseError> {
    let tokens = Lexer::new(source).tokenize(interner)?;
    Parser::new(tokens, interner).parse_program()
}
