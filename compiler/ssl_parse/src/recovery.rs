//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after errors.
//! Membership tests are a single bitwise AND on a `u128`.

use ssl_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds, one bit per [`TokenKind::discriminant_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    #[allow(clippy::needless_pass_by_value)] // const fn builder for static initialization
    pub const fn single(kind: TokenKind) -> Self {
        Self(1u128 << kind.discriminant_index())
    }

    /// Add a token kind (builder pattern for const contexts).
    #[inline]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // const fn builder for static initialization
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.discriminant_index()))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u128 << kind.discriminant_index())) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that can start a top-level item.
pub const ITEM_START: TokenSet = TokenSet::new()
    .with(TokenKind::Variable)
    .with(TokenKind::Procedure)
    .with(TokenKind::Import)
    .with(TokenKind::Export)
    .with(TokenKind::Critical)
    .with(TokenKind::Pure)
    .with(TokenKind::Inline)
    .with(TokenKind::Eof);

/// Where a malformed statement ends or the next one begins.
///
/// `;` is consumed by the caller; the others are left for the enclosing
/// production.
pub const STMT_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::End)
    .with(TokenKind::RBrace)
    .with(TokenKind::Procedure)
    .with(TokenKind::Eof);

/// Where a malformed declaration list ends.
pub const DECL_BOUNDARY: TokenSet = TokenSet::new()
    .with(TokenKind::Semicolon)
    .with(TokenKind::Comma)
    .with(TokenKind::End)
    .with(TokenKind::Procedure)
    .with(TokenKind::Variable)
    .with(TokenKind::Eof);

/// Advance the cursor until reaching a token in the recovery set or EOF.
///
/// Returns `true` if a recovery token was found, `false` if EOF was reached.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains(&cursor.current_kind()) {
            return true;
        }
        cursor.advance();
    }
    false
}

/// Skip a `begin`/`{` block including nested blocks, leaving the cursor
/// after its closing token. The cursor must be on the opening token.
pub fn skip_block(cursor: &mut Cursor<'_>) {
    let mut depth = 0usize;
    while !cursor.is_at_end() {
        match cursor.advance().kind {
            TokenKind::Begin | TokenKind::LBrace => depth += 1,
            TokenKind::End | TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssl_ir::{PoolId, SourceMap, StringPool, Token};

    fn lex(source: &str) -> (Vec<Token>, StringPool) {
        let mut sources = SourceMap::new();
        let file = sources.add("t.ssl");
        let mut scratch = StringPool::new(PoolId::Scratch);
        let out = ssl_lexer::lex(source, file, &mut sources, &mut scratch);
        (out.tokens, scratch)
    }

    #[test]
    fn test_token_set_with() {
        let set = TokenSet::new()
            .with(TokenKind::Semicolon)
            .with(TokenKind::End)
            .with(TokenKind::Eof);

        assert_eq!(set.count(), 3);
        assert!(set.contains(&TokenKind::Semicolon));
        assert!(set.contains(&TokenKind::Eof));
        assert!(!set.contains(&TokenKind::Plus));
    }

    #[test]
    fn test_token_set_data_variants() {
        let set = TokenSet::single(TokenKind::Int(42));
        assert!(set.contains(&TokenKind::Int(999)));
        assert!(!set.contains(&TokenKind::Float(0)));
    }

    #[test]
    fn test_union() {
        let set = TokenSet::single(TokenKind::Semicolon).union(TokenSet::single(TokenKind::End));
        assert!(set.contains(&TokenKind::End));
        assert_eq!(set.count(), 2);
        assert!(TokenSet::default().is_empty());
    }

    #[test]
    fn test_stmt_boundary_contains() {
        assert!(STMT_BOUNDARY.contains(&TokenKind::Semicolon));
        assert!(STMT_BOUNDARY.contains(&TokenKind::End));
        assert!(!STMT_BOUNDARY.contains(&TokenKind::Plus));
        assert!(ITEM_START.contains(&TokenKind::Procedure));
    }

    #[test]
    fn test_synchronize_to_semicolon() {
        let (toks, scratch) = lex("x := 1 + + ; y := 2;");
        let mut cursor = Cursor::new(&toks, &scratch);
        cursor.advance();

        assert!(synchronize(&mut cursor, STMT_BOUNDARY));
        assert!(cursor.check(&TokenKind::Semicolon));
    }

    #[test]
    fn test_synchronize_eof() {
        let (toks, scratch) = lex("x := 1 + 2");
        let mut cursor = Cursor::new(&toks, &scratch);
        assert!(!synchronize(&mut cursor, STMT_BOUNDARY));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_skip_block_handles_nesting() {
        let (toks, scratch) = lex("begin if a then begin b; end { c; } end x");
        let mut cursor = Cursor::new(&toks, &scratch);
        skip_block(&mut cursor);
        assert!(cursor.check_ident());
        assert_eq!(cursor.peek_next_kind(), TokenKind::Eof);
    }
}
