//! Statements and blocks.
//!
//! Assignments are lowered here: `x += e` becomes
//! `x e Add x Store`, `a[i] := e` becomes `e i a StoreIndex`.

use ssl_diagnostic::{Diagnostic, ErrorCode};
use ssl_ir::{Node, NodeKind, NodeList, SourcePos, TokenKind, Value};
use ssl_stack::ensure_sufficient_stack;

use super::decl::unclosed;
use crate::{ParseError, Parser};

/// How an assignment combines the old value with the new one.
#[derive(Copy, Clone, Debug)]
enum AssignOp {
    Set,
    Compound(NodeKind),
    Step(NodeKind),
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assign | TokenKind::Eq => AssignOp::Set,
        TokenKind::PlusAssign => AssignOp::Compound(NodeKind::Add),
        TokenKind::MinusAssign => AssignOp::Compound(NodeKind::Sub),
        TokenKind::StarAssign => AssignOp::Compound(NodeKind::Mul),
        TokenKind::SlashAssign => AssignOp::Compound(NodeKind::Div),
        TokenKind::PlusPlus => AssignOp::Step(NodeKind::Add),
        TokenKind::MinusMinus => AssignOp::Step(NodeKind::Sub),
        _ => return None,
    })
}

impl Parser<'_> {
    /// Parse one statement into `out`.
    pub(crate) fn parse_statement(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner(out))
    }

    fn parse_statement_inner(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Begin | TokenKind::LBrace => self.parse_block(out),
            TokenKind::If => self.parse_if(out),
            TokenKind::While => self.parse_while(out),
            TokenKind::For => self.parse_for(out),
            TokenKind::Return => self.parse_return(out),
            TokenKind::Break | TokenKind::Continue => self.parse_loop_jump(out),
            TokenKind::Call => self.parse_call_stmt(out),
            TokenKind::Variable
            | TokenKind::Import
            | TokenKind::Export
            | TokenKind::Critical
            | TokenKind::Pure
            | TokenKind::Inline => {
                let quals = self.parse_qualifiers();
                if !self.cursor.check(&TokenKind::Variable) {
                    return Err(self.cursor.make_expect_error("`variable`"));
                }
                self.parse_var_decl(&quals, out)
            }
            _ => {
                self.parse_simple(out)?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                Ok(())
            }
        }
    }

    /// `begin ... end` or `{ ... }`. The cursor must be on the opener.
    ///
    /// Malformed statements inside are reported and skipped; only a block
    /// that is never closed fails.
    pub(crate) fn parse_block(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let open = self.cursor.advance();
        loop {
            match self.cursor.current_kind() {
                TokenKind::End | TokenKind::RBrace => {
                    let close = self.cursor.advance();
                    let expected = match open.kind {
                        TokenKind::LBrace => TokenKind::RBrace,
                        _ => TokenKind::End,
                    };
                    if close.kind != expected {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E1001)
                                .with_message(format!(
                                    "`{}` closed by `{}`",
                                    open.kind.friendly_name(),
                                    close.kind.friendly_name()
                                ))
                                .with_label(close.pos, "mismatched closer")
                                .with_secondary_label(open.pos, "block opened here"),
                        );
                    }
                    return Ok(());
                }
                TokenKind::Eof | TokenKind::Procedure => return Err(unclosed(open, "block")),
                _ => {}
            }

            let start = self.cursor.position();
            let mark = out.len();
            if let Err(err) = self.parse_statement(out) {
                out.truncate(mark);
                if err.code == ErrorCode::E1003 {
                    return Err(err);
                }
                self.report(err);
                self.recover_stmt();
            }
            if self.cursor.position() == start {
                self.cursor.advance();
            }
        }
    }

    /// `if cond then stmt [else stmt]`
    fn parse_if(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let pos = self.cursor.advance().pos;
        self.parse_expr(out)?;
        self.cursor.expect(&TokenKind::Then)?;
        out.push(Node::op(NodeKind::If, pos));
        self.parse_statement(out)?;
        if self.cursor.check(&TokenKind::Else) {
            let else_pos = self.cursor.advance().pos;
            out.push(Node::op(NodeKind::Else, else_pos));
            self.parse_statement(out)?;
        }
        out.push(Node::op(NodeKind::EndIf, self.cursor.previous_pos()));
        Ok(())
    }

    /// `while cond do stmt`
    fn parse_while(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let pos = self.cursor.advance().pos;
        out.push(Node::op(NodeKind::Loop, pos));
        self.parse_expr(out)?;
        self.cursor.expect(&TokenKind::Do)?;
        out.push(Node::op(NodeKind::LoopCond, pos));
        self.parse_loop_body(out)?;
        out.push(Node::op(NodeKind::EndLoop, self.cursor.previous_pos()));
        Ok(())
    }

    /// `for ([init]; [cond]; [step]) stmt`
    ///
    /// The initializer runs once before `Loop`; a missing condition loops
    /// forever.
    fn parse_for(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let pos = self.cursor.advance().pos;
        self.cursor.expect(&TokenKind::LParen)?;
        if !self.cursor.check(&TokenKind::Semicolon) {
            self.parse_simple(out)?;
        }
        self.cursor.expect(&TokenKind::Semicolon)?;

        out.push(Node::op(NodeKind::Loop, pos));
        if self.cursor.check(&TokenKind::Semicolon) {
            out.push(Node::new(NodeKind::Int, Value::Int(1), pos));
        } else {
            self.parse_expr(out)?;
        }
        self.cursor.expect(&TokenKind::Semicolon)?;
        out.push(Node::op(NodeKind::LoopCond, pos));

        let mut step = NodeList::new();
        if !self.cursor.check(&TokenKind::RParen) {
            self.parse_simple(&mut step)?;
        }
        self.cursor.expect(&TokenKind::RParen)?;

        self.parse_loop_body(out)?;
        if !step.is_empty() {
            out.push(Node::op(NodeKind::LoopStep, pos));
            out.append(&mut step);
        }
        out.push(Node::op(NodeKind::EndLoop, self.cursor.previous_pos()));
        Ok(())
    }

    fn parse_loop_body(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        self.loop_depth += 1;
        let result = self.parse_statement(out);
        self.loop_depth -= 1;
        result
    }

    /// `return [expr];`
    fn parse_return(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let pos = self.cursor.advance().pos;
        let has_value = !self.cursor.check(&TokenKind::Semicolon);
        if has_value {
            self.parse_expr(out)?;
        }
        self.cursor.expect(&TokenKind::Semicolon)?;
        out.push(Node::new(
            NodeKind::Return,
            Value::Int(i32::from(has_value)),
            pos,
        ));
        Ok(())
    }

    /// `break;` and `continue;`
    fn parse_loop_jump(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let token = self.cursor.advance();
        let kind = match token.kind {
            TokenKind::Break => NodeKind::Break,
            _ => NodeKind::Continue,
        };
        if self.loop_depth == 0 {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(format!(
                        "`{}` outside of a loop",
                        token.kind.friendly_name()
                    ))
                    .with_label(token.pos, "not inside `while` or `for`"),
            );
        } else {
            out.push(Node::op(kind, token.pos));
        }
        self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(())
    }

    /// `call name [(args)];`
    fn parse_call_stmt(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        self.cursor.advance();
        let (id, pos) = self.cursor.expect_ident()?;
        let callee = self.mention(id, pos);
        let argc = if self.cursor.eat(&TokenKind::LParen) {
            self.parse_args(out)?
        } else {
            0
        };
        self.cursor.expect(&TokenKind::Semicolon)?;
        out.push(callee);
        out.push(Node::new(NodeKind::Call, Value::Int(argc), pos));
        out.push(Node::op(NodeKind::Pop, pos));
        Ok(())
    }

    /// An assignment or an expression whose value is discarded.
    fn parse_simple(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        if self.at_assignment() {
            return self.parse_assignment(out);
        }
        let pos = self.cursor.current_pos();
        self.parse_expr(out)?;
        out.push(Node::op(NodeKind::Pop, pos));
        Ok(())
    }

    /// Whether the cursor is on `name op` or `name[...] op` with `op` an
    /// assignment operator.
    fn at_assignment(&self) -> bool {
        if !self.cursor.check_ident() {
            return false;
        }
        let mut offset = 1;
        if self.cursor.peek_kind(offset) == TokenKind::LBracket {
            let mut depth = 0usize;
            loop {
                match self.cursor.peek_kind(offset) {
                    TokenKind::LBracket => depth += 1,
                    TokenKind::RBracket => {
                        depth -= 1;
                        if depth == 0 {
                            offset += 1;
                            break;
                        }
                    }
                    TokenKind::Eof | TokenKind::Semicolon => return false,
                    _ => {}
                }
                offset += 1;
            }
        }
        assign_op(self.cursor.peek_kind(offset)).is_some()
    }

    fn parse_assignment(&mut self, out: &mut NodeList) -> Result<(), ParseError> {
        let (id, pos) = self.cursor.expect_ident()?;
        let target = self.mention(id, pos);

        let mut index = None;
        if self.cursor.eat(&TokenKind::LBracket) {
            let mut nodes = NodeList::new();
            self.parse_expr(&mut nodes)?;
            self.cursor.expect(&TokenKind::RBracket)?;
            index = Some(nodes);
        }

        let op_token = self.cursor.advance();
        let op_pos = op_token.pos;
        let Some(op) = assign_op(op_token.kind) else {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected assignment operator, found `{}`",
                    op_token.kind.friendly_name()
                ),
                op_pos,
            ));
        };

        match op {
            AssignOp::Set => self.parse_expr(out)?,
            AssignOp::Compound(kind) => {
                read_target(out, target, index.as_ref(), op_pos);
                self.parse_expr(out)?;
                out.push(Node::op(kind, op_pos));
            }
            AssignOp::Step(kind) => {
                read_target(out, target, index.as_ref(), op_pos);
                out.push(Node::new(NodeKind::Int, Value::Int(1), op_pos));
                out.push(Node::op(kind, op_pos));
            }
        }

        match index {
            Some(mut nodes) => {
                out.append(&mut nodes);
                out.push(target);
                out.push(Node::op(NodeKind::StoreIndex, op_pos));
            }
            None => {
                out.push(target);
                out.push(Node::op(NodeKind::Store, op_pos));
            }
        }
        Ok(())
    }
}

/// Push the current value of an assignment target.
fn read_target(out: &mut NodeList, target: Node, index: Option<&NodeList>, pos: SourcePos) {
    out.push(target);
    if let Some(index) = index {
        for node in index {
            out.push(*node);
        }
        out.push(Node::op(NodeKind::Index, pos));
    }
}
