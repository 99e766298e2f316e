//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use ssl_diagnostic::ErrorCode;
use ssl_ir::{SourcePos, StrId, StringPool, Token, TokenKind};

use crate::ParseError;

/// Cursor over a spliced token stream.
///
/// Identifier and literal payloads are handles into the loader's scratch
/// pool, which the cursor carries so grammar code can read their text.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    scratch: &'a StringPool,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `tokens`, which must end with `Eof`.
    pub fn new(tokens: &'a [Token], scratch: &'a StringPool) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor {
            tokens,
            scratch,
            pos: 0,
        }
    }

    /// Text behind a scratch-pool handle.
    pub fn text(&self, id: StrId) -> &'a str {
        self.scratch.lookup(id)
    }

    /// Current index in the token stream.
    ///
    /// Compared before and after a production to tell whether it consumed
    /// anything.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    ///
    /// The last token is always `Eof` and `advance` never moves past it.
    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_pos(&self) -> SourcePos {
        self.current().pos
    }

    /// Position of the most recently consumed token.
    pub fn previous_pos(&self) -> SourcePos {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].pos,
            None => self.current_pos(),
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token's kind, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().discriminant_index() == kind.discriminant_index()
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        self.current_kind().is_ident()
    }

    /// One-token lookahead; `Eof` past the end.
    pub fn peek_next_kind(&self) -> TokenKind {
        self.peek_kind(1)
    }

    /// Kind of the token `offset` places ahead; `Eof` past the end.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Consume the current token and return it. Stays on `Eof`.
    #[inline]
    pub fn advance(&mut self) -> &'a Token {
        let current = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        current
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect the current token to be of the given kind, advance and return it.
    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(&format!("`{}`", kind.friendly_name())))
        }
    }

    #[cold]
    #[inline(never)]
    pub fn make_expect_error(&self, expected: &str) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {expected}, found `{}`",
                self.current_kind().friendly_name()
            ),
            self.current_pos(),
        )
        .with_context(format!("expected {expected}"))
    }

    /// Expect and consume an identifier, returning its scratch handle.
    pub fn expect_ident(&mut self) -> Result<(StrId, SourcePos), ParseError> {
        if let TokenKind::Ident(id) = self.current_kind() {
            let pos = self.current_pos();
            self.advance();
            Ok((id, pos))
        } else {
            Err(ParseError::new(
                ErrorCode::E1004,
                format!(
                    "expected identifier, found `{}`",
                    self.current_kind().friendly_name()
                ),
                self.current_pos(),
            )
            .with_context("expected identifier"))
        }
    }
}
