use logos::Logos;

/// Scan a `/* ... */` comment; the payload is whether it was closed.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Raw token from logos (before interning).
///
/// Keywords are matched ASCII case-insensitively; identifiers keep their case.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment(bool),

    #[token("\n")]
    Newline,

    /// A whole preprocessor line, classified by the `directive` module.
    #[regex(r"#[^\n]*")]
    Directive,

    #[token("variable", ignore(ascii_case))]
    Variable,
    #[token("procedure", ignore(ascii_case))]
    Procedure,
    #[token("import", ignore(ascii_case))]
    Import,
    #[token("export", ignore(ascii_case))]
    Export,
    #[token("critical", ignore(ascii_case))]
    Critical,
    #[token("pure", ignore(ascii_case))]
    Pure,
    #[token("inline", ignore(ascii_case))]
    Inline,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("when", ignore(ascii_case))]
    When,
    #[token("begin", ignore(ascii_case))]
    Begin,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("do", ignore(ascii_case))]
    Do,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("break", ignore(ascii_case))]
    Break,
    #[token("continue", ignore(ascii_case))]
    Continue,
    #[token("call", ignore(ascii_case))]
    Call,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("mod", ignore(ascii_case))]
    Mod,
    #[token("bwand", ignore(ascii_case))]
    BwAnd,
    #[token("bwor", ignore(ascii_case))]
    BwOr,
    #[token("bwxor", ignore(ascii_case))]
    BwXor,
    #[token("bwnot", ignore(ascii_case))]
    BwNot,
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("@")]
    At,

    #[token(":=")]
    Assign,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInt,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,
    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    UnterminatedString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
