//! Lexer error types.
//!
//! The lexer never fails: problems are recorded here and the offending input
//! becomes a `TokenKind::Error` token (or is skipped, for bad directives).

use std::fmt;

use ssl_ir::SourcePos;

/// A lexer error and where it happened.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub pos: SourcePos,
    pub kind: LexErrorKind,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A character that starts no token.
    InvalidChar(char),
    /// Missing closing `"`.
    UnterminatedString,
    /// Missing closing `*/`.
    UnterminatedComment,
    /// `\0` inside a string; pool entries are NUL-terminated.
    NulInString,
    /// Integer literal that does not fit 32 bits, or an unparsable float.
    MalformedNumber(String),
    /// `#name` the frontend does not understand.
    UnknownDirective(String),
    /// `#include` or `#line` with unusable arguments.
    MalformedDirective(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::InvalidChar(c) => write!(f, "invalid character `{}`", c.escape_default()),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated block comment"),
            LexErrorKind::NulInString => write!(f, "NUL character in string literal"),
            LexErrorKind::MalformedNumber(text) => write!(f, "malformed number `{text}`"),
            LexErrorKind::UnknownDirective(name) => {
                write!(f, "unknown preprocessor directive `#{name}`")
            }
            LexErrorKind::MalformedDirective(name) => write!(f, "malformed `#{name}` directive"),
        }
    }
}
