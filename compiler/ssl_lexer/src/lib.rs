//! Lexer for SSL using logos.
//!
//! This lexer:
//! - Interns identifiers, string literals and include paths into a scratch pool
//! - Matches keywords ASCII case-insensitively
//! - Skips comments and whitespace (the frontend keeps no trivia)
//! - Applies `#line` markers so positions point back into the original files
//! - Turns `#include` lines into `TokenKind::Include` for the source loader
//!
//! Lexing never fails; problems are returned as [`LexError`]s next to the
//! token stream, and the offending text becomes a `TokenKind::Error` token.

mod directive;
mod escape;
mod lex_error;
mod line_map;
mod raw_token;

use logos::Logos;
use ssl_ir::{FileId, SourceMap, SourcePos, StrId, StringPool, Token, TokenKind};

use directive::Directive;
use line_map::{LineMap, LineRemap};
use raw_token::RawToken;

pub use lex_error::{LexError, LexErrorKind};

/// Result of lexing one buffer.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    /// Tokens in source order, always terminated by `Eof`.
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    fn error(&mut self, pos: SourcePos, kind: LexErrorKind) {
        self.errors.push(LexError { pos, kind });
    }
}

/// Lexer over one source buffer.
///
/// `sources` receives any file named by a `#line` marker; `scratch` receives
/// identifier, string and include-path text.
pub struct Lexer<'src, 'ctx> {
    source: &'src str,
    file: FileId,
    sources: &'ctx mut SourceMap,
    scratch: &'ctx mut StringPool,
}

impl<'src, 'ctx> Lexer<'src, 'ctx> {
    pub fn new(
        source: &'src str,
        file: FileId,
        sources: &'ctx mut SourceMap,
        scratch: &'ctx mut StringPool,
    ) -> Self {
        Lexer {
            source,
            file,
            sources,
            scratch,
        }
    }

    /// Lex all tokens from the source.
    pub fn lex_all(mut self) -> LexOutput {
        let lines = LineMap::new(self.source);
        let mut remap = LineRemap::identity(self.file);
        let mut out = LexOutput::default();
        let mut logos = RawToken::lexer(self.source);

        while let Some(result) = logos.next() {
            let slice = logos.slice();
            let (line, column) = lines.line_col(logos.span().start);
            let pos = remap.map(line, column);

            let raw = match result {
                Ok(raw) => raw,
                Err(()) => {
                    let c = slice.chars().next().unwrap_or('\u{FFFD}');
                    out.error(pos, LexErrorKind::InvalidChar(c));
                    out.tokens.push(Token::new(TokenKind::Error, pos));
                    continue;
                }
            };

            let kind = match raw {
                RawToken::LineComment | RawToken::Newline | RawToken::BlockComment(true) => {
                    continue;
                }
                RawToken::BlockComment(false) => {
                    out.error(pos, LexErrorKind::UnterminatedComment);
                    continue;
                }
                RawToken::Directive => {
                    match directive::classify(slice) {
                        Directive::Include(path) => match self.scratch.try_intern(path) {
                            Ok(id) => TokenKind::Include(id),
                            Err(_) => {
                                out.error(pos, LexErrorKind::MalformedDirective("include".into()));
                                continue;
                            }
                        },
                        Directive::Line { line: mapped, file } => {
                            let file = file.map(|f| self.sources.add(f));
                            remap.reset(line, mapped, file);
                            continue;
                        }
                        Directive::Ignored => continue,
                        Directive::Unknown(name) => {
                            out.error(pos, LexErrorKind::UnknownDirective(name.to_string()));
                            continue;
                        }
                        Directive::Malformed(name) => {
                            out.error(pos, LexErrorKind::MalformedDirective(name.to_string()));
                            continue;
                        }
                    }
                }
                RawToken::Int => match parse_decimal(slice) {
                    Some(v) => TokenKind::Int(v),
                    None => malformed_number(&mut out, pos, slice),
                },
                RawToken::HexInt => match u32::from_str_radix(&slice[2..], 16) {
                    Ok(v) => TokenKind::Int(wrap_u32(v)),
                    Err(_) => malformed_number(&mut out, pos, slice),
                },
                RawToken::Float => match slice.parse::<f32>() {
                    Ok(v) if v.is_finite() => TokenKind::Float(v.to_bits()),
                    _ => malformed_number(&mut out, pos, slice),
                },
                RawToken::String => {
                    let content = &slice[1..slice.len() - 1];
                    match escape::unescape_string(content).map(|s| self.scratch.try_intern(&s)) {
                        Some(Ok(id)) => TokenKind::Str(id),
                        _ => {
                            out.error(pos, LexErrorKind::NulInString);
                            TokenKind::Error
                        }
                    }
                }
                RawToken::UnterminatedString => {
                    out.error(pos, LexErrorKind::UnterminatedString);
                    TokenKind::Error
                }
                RawToken::Ident => match self.intern_ident(slice) {
                    Some(id) => TokenKind::Ident(id),
                    None => TokenKind::Error,
                },
                other => convert_fixed(other),
            };
            out.tokens.push(Token::new(kind, pos));
        }

        let (line, column) = lines.line_col(self.source.len());
        out.tokens
            .push(Token::new(TokenKind::Eof, remap.map(line, column)));
        out
    }

    fn intern_ident(&mut self, text: &str) -> Option<StrId> {
        self.scratch.try_intern(text).ok()
    }
}

/// Lex `source` as file `file`.
pub fn lex(
    source: &str,
    file: FileId,
    sources: &mut SourceMap,
    scratch: &mut StringPool,
) -> LexOutput {
    Lexer::new(source, file, sources, scratch).lex_all()
}

/// Decimal literals up to `u32::MAX` are accepted and wrap, so `4294967295`
/// spells `-1` the way a 32-bit engine reads it.
fn parse_decimal(text: &str) -> Option<i32> {
    text.parse::<u32>().ok().map(wrap_u32)
}

#[allow(clippy::cast_possible_wrap, reason = "literals are 32-bit patterns")]
fn wrap_u32(v: u32) -> i32 {
    v as i32
}

fn malformed_number(out: &mut LexOutput, pos: SourcePos, text: &str) -> TokenKind {
    out.error(pos, LexErrorKind::MalformedNumber(text.to_string()));
    TokenKind::Error
}

/// Convert a payload-free raw token.
fn convert_fixed(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Variable => TokenKind::Variable,
        RawToken::Procedure => TokenKind::Procedure,
        RawToken::Import => TokenKind::Import,
        RawToken::Export => TokenKind::Export,
        RawToken::Critical => TokenKind::Critical,
        RawToken::Pure => TokenKind::Pure,
        RawToken::Inline => TokenKind::Inline,
        RawToken::In => TokenKind::In,
        RawToken::When => TokenKind::When,
        RawToken::Begin => TokenKind::Begin,
        RawToken::End => TokenKind::End,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Call => TokenKind::Call,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Mod => TokenKind::Mod,
        RawToken::BwAnd => TokenKind::BwAnd,
        RawToken::BwOr => TokenKind::BwOr,
        RawToken::BwXor => TokenKind::BwXor,
        RawToken::BwNot => TokenKind::BwNot,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::At => TokenKind::At,

        RawToken::Assign => TokenKind::Assign,
        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::StarAssign => TokenKind::StarAssign,
        RawToken::SlashAssign => TokenKind::SlashAssign,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,

        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,

        // Payload-carrying and trivia tokens are converted by the caller.
        RawToken::LineComment
        | RawToken::BlockComment(_)
        | RawToken::Newline
        | RawToken::Directive
        | RawToken::HexInt
        | RawToken::Int
        | RawToken::Float
        | RawToken::String
        | RawToken::UnterminatedString
        | RawToken::Ident => TokenKind::Error,
    }
}
