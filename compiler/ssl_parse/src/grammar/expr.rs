//! Expression parsing.
//!
//! Binary operators use precedence climbing over a single table; operands
//! are emitted before their operator so the output is already postfix.

use ssl_diagnostic::ErrorCode;
use ssl_ir::{Node, NodeKind, NodeList, TokenKind, Value};
use ssl_stack::ensure_sufficient_stack;

use crate::symbols::pool_diagnostic;
use crate::{ParseError, Parser};

/// Binding power and node for a binary operator token. Higher binds tighter.
fn binary_op(kind: TokenKind) -> Option<(u8, NodeKind)> {
    Some(match kind {
        TokenKind::Or | TokenKind::PipePipe => (1, NodeKind::Or),
        TokenKind::And | TokenKind::AmpAmp => (2, NodeKind::And),
        TokenKind::BwOr => (3, NodeKind::BwOr),
        TokenKind::BwXor => (4, NodeKind::BwXor),
        TokenKind::BwAnd => (5, NodeKind::BwAnd),
        TokenKind::EqEq => (6, NodeKind::Eq),
        TokenKind::NotEq => (6, NodeKind::Ne),
        TokenKind::Lt => (7, NodeKind::Lt),
        TokenKind::LtEq => (7, NodeKind::Le),
        TokenKind::Gt => (7, NodeKind::Gt),
        TokenKind::GtEq => (7, NodeKind::Ge),
        TokenKind::Plus => (8, NodeKind::Add),
        TokenKind::Minus => (8, NodeKind::Sub),
        TokenKind::Star => (9, NodeKind::Mul),
        TokenKind::Slash => (9, NodeKind::Div),
        TokenKind::Percent | TokenKind::Mod => (9, NodeKind::Mod),
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse an expression into `out`.
    pub(crate) fn parse_expr(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        ensure_sufficient_stack(|| self.parse_binary(out, 1))
    }

    fn parse_binary(&mut self, out: &mut NodeList, min_prec: u8) -> Result<(), ParseError> {
        self.parse_unary(out)?;
        while let Some((prec, op)) = binary_op(self.cursor.current_kind()) {
            if prec < min_prec {
                break;
            }
            let pos = self.cursor.advance().pos;
            self.parse_binary(out, prec + 1)?;
            out.push(Node::op(op, pos));
        }
        Ok(())
    }

    fn parse_unary(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => NodeKind::Neg,
            TokenKind::Not | TokenKind::Bang => NodeKind::Not,
            TokenKind::BwNot => NodeKind::BwNot,
            _ => return self.parse_postfix(out),
        };
        let pos = self.cursor.advance().pos;
        ensure_sufficient_stack(|| self.parse_unary(out))?;
        out.push(Node::op(op, pos));
        Ok(())
    }

    /// A primary followed by any number of `[index]` suffixes.
    fn parse_postfix(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        self.parse_primary(out)?;
        while self.cursor.check(&TokenKind::LBracket) {
            let pos = self.cursor.advance().pos;
            self.parse_expr(out)?;
            self.cursor.expect(&TokenKind::RBracket)?;
            out.push(Node::op(NodeKind::Index, pos));
        }
        Ok(())
    }

    fn parse_primary(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let token = self.cursor.current();
        let pos = token.pos;
        match token.kind {
            TokenKind::Int(v) => {
                self.cursor.advance();
                out.push(Node::new(NodeKind::Int, Value::Int(v), pos));
            }
            TokenKind::Float(bits) => {
                self.cursor.advance();
                out.push(Node::new(
                    NodeKind::Float,
                    Value::Float(f32::from_bits(bits)),
                    pos,
                ));
            }
            TokenKind::Str(id) => {
                self.cursor.advance();
                let text = self.cursor.text(id);
                match self.symbols.stringspace.try_intern(text) {
                    Ok(sid) => out.push(Node::new(NodeKind::String, Value::String(sid), pos)),
                    Err(e) => {
                        self.diagnostics.push(pool_diagnostic(pos, &e));
                        out.push(Node::op(NodeKind::Error, pos));
                    }
                }
            }
            TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                let v = i32::from(token.kind == TokenKind::True);
                out.push(Node::new(NodeKind::Int, Value::Int(v), pos));
            }
            TokenKind::Ident(id) => {
                self.cursor.advance();
                let callee = self.mention(id, pos);
                if self.cursor.eat(&TokenKind::LParen) {
                    let argc = self.parse_args(out)?;
                    out.push(callee);
                    out.push(Node::new(NodeKind::Call, Value::Int(argc), pos));
                } else {
                    out.push(callee);
                }
            }
            TokenKind::At => {
                self.cursor.advance();
                let (id, name_pos) = self.cursor.expect_ident()?;
                out.push(self.mention(id, name_pos));
                out.push(Node::op(NodeKind::ProcAddr, pos));
            }
            TokenKind::LParen => {
                self.cursor.advance();
                self.parse_expr(out)?;
                self.cursor.expect(&TokenKind::RParen)?;
            }
            // The lexer already reported this token.
            TokenKind::Error => {
                self.cursor.advance();
                out.push(Node::op(NodeKind::Error, pos));
            }
            found => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found `{}`", found.friendly_name()),
                    pos,
                )
                .with_context("expected expression"));
            }
        }
        Ok(())
    }

    /// Arguments after an opening `(`, through the closing `)`. Returns the
    /// argument count.
    pub(crate) fn parse_args(&mut self, out: &mut NodeList) -> Result<i32, ParseError> {
        let mut argc = 0i32;
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                self.parse_expr(out)?;
                argc = argc.saturating_add(1);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(argc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table_orders_levels() {
        let level = |k| binary_op(k).map(|(p, _)| p);
        assert!(level(TokenKind::Or) < level(TokenKind::And));
        assert!(level(TokenKind::BwAnd) < level(TokenKind::EqEq));
        assert!(level(TokenKind::Plus) < level(TokenKind::Star));
        assert_eq!(binary_op(TokenKind::Mod), Some((9, NodeKind::Mod)));
        assert_eq!(binary_op(TokenKind::Assign), None);
    }
}
