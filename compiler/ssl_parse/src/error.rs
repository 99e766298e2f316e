//! Parse errors and the conversion of lexer errors into diagnostics.

use ssl_diagnostic::{Diagnostic, ErrorCode};
use ssl_ir::SourcePos;
use ssl_lexer::{LexError, LexErrorKind};

/// A syntax error raised by a grammar production.
///
/// Productions return `Result<_, ParseError>`; the statement loop turns the
/// error into a diagnostic and resynchronizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    pub pos: SourcePos,
    /// Label text at the error position.
    pub context: Option<String>,
    /// Extra notes.
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, pos: SourcePos) -> Self {
        ParseError {
            code,
            message: message.into(),
            pos,
            context: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Convert to a full Diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.pos, self.context.as_deref().unwrap_or("here"));

        for help in &self.help {
            diag = diag.with_note(help);
        }

        diag
    }
}

/// Convert a lexer error into a syntax diagnostic.
pub fn lex_error_to_diagnostic(err: &LexError) -> Diagnostic {
    let (code, label) = match &err.kind {
        LexErrorKind::InvalidChar(_) => (ErrorCode::E1008, "not valid here"),
        LexErrorKind::UnterminatedString | LexErrorKind::NulInString => {
            (ErrorCode::E1009, "string starts here")
        }
        LexErrorKind::UnterminatedComment => (ErrorCode::E1003, "comment starts here"),
        LexErrorKind::MalformedNumber(_) => (ErrorCode::E1011, "not a 32-bit number"),
        LexErrorKind::UnknownDirective(_) | LexErrorKind::MalformedDirective(_) => {
            (ErrorCode::E1010, "directive ignored")
        }
    };
    Diagnostic::error(code)
        .with_message(err.kind.to_string())
        .with_label(err.pos, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssl_ir::FileId;

    #[test]
    fn test_parse_error_to_diagnostic() {
        let pos = SourcePos::new(FileId::PRIMARY, 3, 9);
        let diag = ParseError::new(ErrorCode::E1001, "expected ;, found `end`", pos)
            .with_context("expected ;")
            .with_help("statements end with `;`")
            .to_diagnostic();

        assert_eq!(diag.code, ErrorCode::E1001);
        assert_eq!(diag.pos(), pos);
        assert_eq!(diag.labels[0].message, "expected ;");
        assert_eq!(diag.notes, vec!["statements end with `;`".to_string()]);
    }

    #[test]
    fn test_lex_errors_map_to_syntax_codes() {
        let pos = SourcePos::new(FileId::PRIMARY, 1, 1);
        let cases = [
            (LexErrorKind::InvalidChar('$'), ErrorCode::E1008),
            (LexErrorKind::UnterminatedString, ErrorCode::E1009),
            (LexErrorKind::UnterminatedComment, ErrorCode::E1003),
            (LexErrorKind::MalformedNumber("9".repeat(12)), ErrorCode::E1011),
            (LexErrorKind::UnknownDirective("define".into()), ErrorCode::E1010),
        ];
        for (kind, code) in cases {
            let diag = lex_error_to_diagnostic(&LexError { pos, kind });
            assert_eq!(diag.code, code);
            assert!(diag.code.is_syntax_error());
        }
    }
}
