//! Source text → token stream.
//!
//! Single-stage, byte-oriented scanning: a cursor over the raw bytes of
//! the source, advanced character by character. There is no indentation
//! tracking and no lexicon lookup — the language's vocabulary is a
//! handful of fixed keywords and operators.

use crate::error::{LexError, LexResult};
use crate::token::{Token, TokenKind};
use noetic_base::{Interner, Span};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Lexes the entire source, returning all tokens including a trailing
    /// [`TokenKind::Eof`].
    pub fn tokenize(&mut self, interner: &mut Interner) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token(interner)?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.pos += 1;
                }
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self, interner: &mut Interner) -> LexResult<Token> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let Some(b) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, Span::at(start)));
        };

        match b {
            b'(' => self.single(TokenKind::LParen, start),
            b')' => self.single(TokenKind::RParen, start),
            b'[' => self.single(TokenKind::LBracket, start),
            b']' => self.single(TokenKind::RBracket, start),
            b',' => self.single(TokenKind::Comma, start),
            b'|' => self.single(TokenKind::Pipe, start),
            b';' => self.single(TokenKind::Semicolon, start),
            b'!' => self.single(TokenKind::Bang, start),
            b'?' => self.single(TokenKind::Query, start),
            b':' => {
                if self.peek_at(1) == Some(b'-') {
                    self.pos += 2;
                    Ok(Token::new(TokenKind::Implies, Span::new(start, self.pos)))
                } else {
                    self.single(TokenKind::Colon, start)
                }
            }
            b'-' => {
                if self.peek_at(1) == Some(b'>') {
                    self.pos += 2;
                    Ok(Token::new(TokenKind::Arrow, Span::new(start, self.pos)))
                } else if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start)
                } else {
                    Err(LexError::new(
                        format!("unexpected character '{}'", b as char),
                        Span::new(start, start + 1),
                    ))
                }
            }
            b'=' => {
                if self.peek_at(1) == Some(b'~') && self.peek_at(2) == Some(b'=') {
                    self.pos += 3;
                    Ok(Token::new(TokenKind::SemMatch, Span::new(start, self.pos)))
                } else if self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    Ok(Token::new(TokenKind::EqEq, Span::new(start, self.pos)))
                } else {
                    self.single(TokenKind::Eq, start)
                }
            }
            b'.' => {
                self.pos += 1;
                let next_is_ident_start = self
                    .peek()
                    .is_some_and(|c| c == b'_' || c.is_ascii_alphabetic());
                let kind = if next_is_ident_start {
                    TokenKind::Dot
                } else {
                    TokenKind::Period
                };
                Ok(Token::new(kind, Span::new(start, self.pos)))
            }
            b'"' => self.lex_string(start),
            b'0'..=b'9' => self.lex_number(start),
            c if c == b'_' || c.is_ascii_alphabetic() => Ok(self.lex_ident(start, interner)),
            other => Err(LexError::new(
                format!("unexpected character '{}'", other as char),
                Span::new(start, start + 1),
            )),
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> LexResult<Token> {
        self.pos += 1;
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn lex_ident(&mut self, start: usize, interner: &mut Interner) -> Token {
        while self
            .peek()
            .is_some_and(|c| c == b'_' || c.is_ascii_alphanumeric())
        {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);
        let kind = match text {
            "concept" => TokenKind::Concept,
            "entity" => TokenKind::Entity,
            "description" => TokenKind::Description,
            "attributes" => TokenKind::Attributes,
            "essentials" => TokenKind::Essentials,
            "not" => TokenKind::Not,
            _ => TokenKind::Ident(interner.intern(text)),
        };
        Token::new(kind, span)
    }

    fn lex_number(&mut self, start: usize) -> LexResult<Token> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.source[start..self.pos];
        let value: f64 = text.parse().map_err(|_| {
            LexError::new(
                format!("invalid number literal '{text}'"),
                Span::new(start, self.pos),
            )
        })?;
        Ok(Token::new(TokenKind::Number(value), Span::new(start, self.pos)))
    }

    fn lex_string(&mut self, start: usize) -> LexResult<Token> {
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        Span::new(start, self.pos),
                    ))
                }
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'n') => value.push('\n'),
                    Some(b't') => value.push('\t'),
                    Some(b'"') => value.push('"'),
                    Some(b'\\') => value.push('\\'),
                    Some(other) => {
                        return Err(LexError::new(
                            format!("invalid escape sequence '\\{}'", other as char),
                            Span::new(start, self.pos),
                        ))
                    }
                    None => {
                        return Err(LexError::new(
                            "unterminated string literal",
                            Span::new(start, self.pos),
                        ))
                    }
                },
                Some(b) => {
                    // Collect raw bytes between escapes; safe to treat as
                    // UTF-8 since the source itself is.
                    let ch_start = self.pos - 1;
                    let ch_len = utf8_len(b);
                    for _ in 1..ch_len {
                        self.advance();
                    }
                    value.push_str(&self.source[ch_start..self.pos]);
                }
            }
        }
        Ok(Token::new(
            TokenKind::StringLit(value),
            Span::new(start, self.pos),
        ))
    }
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(src);
        lexer
            .tokenize(&mut interner)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_a_fact() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("man(socrates).");
        let tokens = lexer.tokenize(&mut interner).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[1].kind, TokenKind::LParen);
        assert!(matches!(tokens[2].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[3].kind, TokenKind::RParen);
        assert_eq!(tokens[4].kind, TokenKind::Period);
        assert_eq!(tokens[5].kind, TokenKind::Eof);
    }

    #[test]
    fn distinguishes_period_from_field_dot() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("E.description");
        let tokens = lexer.tokenize(&mut interner).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn period_before_newline_is_statement_terminator() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("man(socrates).\nmortal(X) :- man(X).");
        let tokens = lexer.tokenize(&mut interner).unwrap();
        let period_count = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Period)
            .count();
        assert_eq!(period_count, 2);
    }

    #[test]
    fn lexes_operators_by_maximal_munch() {
        assert_eq!(kinds("="), vec![TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::EqEq, TokenKind::Eof]);
        assert_eq!(kinds("=~="), vec![TokenKind::SemMatch, TokenKind::Eof]);
        assert_eq!(kinds(":-"), vec![TokenKind::Implies, TokenKind::Eof]);
        assert_eq!(kinds("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
    }

    #[test]
    fn skips_comments_and_whitespace() {
        let kinds = kinds("# a comment\n   !  ");
        assert_eq!(kinds, vec![TokenKind::Bang, TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escapes() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(r#""a\n\"b\\c""#);
        let tokens = lexer.tokenize(&mut interner).unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::StringLit("a\n\"b\\c".to_string())
        );
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("\"abc");
        assert!(lexer.tokenize(&mut interner).is_err());
    }

    #[test]
    fn lexes_negative_and_fractional_numbers() {
        assert_eq!(kinds("-3"), vec![TokenKind::Number(-3.0), TokenKind::Eof]);
        assert_eq!(kinds("3.5"), vec![TokenKind::Number(3.5), TokenKind::Eof]);
    }

    #[test]
    fn keyword_recognition() {
        assert_eq!(
            kinds("concept entity description attributes essentials not"),
            vec![
                TokenKind::Concept,
                TokenKind::Entity,
                TokenKind::Description,
                TokenKind::Attributes,
                TokenKind::Essentials,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
    }
}
