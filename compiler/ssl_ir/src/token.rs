//! Tokens produced by the lexer.

use crate::{SourcePos, StrId};

/// Kind of a lexical token.
///
/// Identifier, string and directive payloads are handles into the lexer's
/// scratch pool; the parser copies text into the unit's pools only for the
/// names and literals it actually keeps.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Int(i32),
    /// IEEE-754 bits of an `f32` literal.
    Float(u32),
    Str(StrId),
    Ident(StrId),

    // Declarations
    Variable,
    Procedure,
    Import,
    Export,
    Critical,
    Pure,
    Inline,
    In,
    When,

    // Blocks and statements
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    For,
    Return,
    Break,
    Continue,
    Call,

    // Word operators
    And,
    Or,
    Not,
    Mod,
    BwAnd,
    BwOr,
    BwXor,
    BwNot,
    True,
    False,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    At,

    // Assignment
    /// `:=`
    Assign,
    /// `=`
    Eq,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PlusPlus,
    MinusMinus,

    // Operators
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AmpAmp,
    PipePipe,

    /// `#include "path"`; the payload is the quoted path.
    Include(StrId),

    /// Unlexable input; the lexer has already reported it.
    Error,
    Eof,
}

impl TokenKind {
    /// Highest value returned by [`TokenKind::discriminant_index`].
    pub const MAX_DISCRIMINANT: u8 = 75;

    /// Dense index of the variant, ignoring payloads.
    ///
    /// Used by bitset token sets in the parser's recovery code.
    pub const fn discriminant_index(&self) -> u8 {
        match self {
            TokenKind::Int(_) => 0,
            TokenKind::Float(_) => 1,
            TokenKind::Str(_) => 2,
            TokenKind::Ident(_) => 3,
            TokenKind::Variable => 4,
            TokenKind::Procedure => 5,
            TokenKind::Import => 6,
            TokenKind::Export => 7,
            TokenKind::Critical => 8,
            TokenKind::Pure => 9,
            TokenKind::Inline => 10,
            TokenKind::In => 11,
            TokenKind::When => 12,
            TokenKind::Begin => 13,
            TokenKind::End => 14,
            TokenKind::If => 15,
            TokenKind::Then => 16,
            TokenKind::Else => 17,
            TokenKind::While => 18,
            TokenKind::Do => 19,
            TokenKind::For => 20,
            TokenKind::Return => 21,
            TokenKind::Break => 22,
            TokenKind::Continue => 23,
            TokenKind::Call => 24,
            TokenKind::And => 25,
            TokenKind::Or => 26,
            TokenKind::Not => 27,
            TokenKind::Mod => 28,
            TokenKind::BwAnd => 29,
            TokenKind::BwOr => 30,
            TokenKind::BwXor => 31,
            TokenKind::BwNot => 32,
            TokenKind::True => 33,
            TokenKind::False => 34,
            TokenKind::LParen => 35,
            TokenKind::RParen => 36,
            TokenKind::LBracket => 37,
            TokenKind::RBracket => 38,
            TokenKind::LBrace => 39,
            TokenKind::RBrace => 40,
            TokenKind::Comma => 41,
            TokenKind::Semicolon => 42,
            TokenKind::At => 43,
            TokenKind::Assign => 44,
            TokenKind::Eq => 45,
            TokenKind::PlusAssign => 46,
            TokenKind::MinusAssign => 47,
            TokenKind::StarAssign => 48,
            TokenKind::SlashAssign => 49,
            TokenKind::PlusPlus => 50,
            TokenKind::MinusMinus => 51,
            TokenKind::EqEq => 52,
            TokenKind::NotEq => 53,
            TokenKind::Lt => 54,
            TokenKind::LtEq => 55,
            TokenKind::Gt => 56,
            TokenKind::GtEq => 57,
            TokenKind::Plus => 58,
            TokenKind::Minus => 59,
            TokenKind::Star => 60,
            TokenKind::Slash => 61,
            TokenKind::Percent => 62,
            TokenKind::Bang => 63,
            TokenKind::AmpAmp => 64,
            TokenKind::PipePipe => 65,
            TokenKind::Include(_) => 66,
            TokenKind::Error => 67,
            TokenKind::Eof => 75,
        }
    }

    /// Human-readable spelling for error messages.
    pub const fn friendly_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Variable => "variable",
            TokenKind::Procedure => "procedure",
            TokenKind::Import => "import",
            TokenKind::Export => "export",
            TokenKind::Critical => "critical",
            TokenKind::Pure => "pure",
            TokenKind::Inline => "inline",
            TokenKind::In => "in",
            TokenKind::When => "when",
            TokenKind::Begin => "begin",
            TokenKind::End => "end",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Call => "call",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Mod => "mod",
            TokenKind::BwAnd => "bwand",
            TokenKind::BwOr => "bwor",
            TokenKind::BwXor => "bwxor",
            TokenKind::BwNot => "bwnot",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::At => "@",
            TokenKind::Assign => ":=",
            TokenKind::Eq => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Include(_) => "#include",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether this token is an identifier.
    #[inline]
    pub const fn is_ident(&self) -> bool {
        matches!(self, TokenKind::Ident(_))
    }
}

/// A token with its mapped source position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: SourcePos,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, pos: SourcePos) -> Self {
        Token { kind, pos }
    }
}
