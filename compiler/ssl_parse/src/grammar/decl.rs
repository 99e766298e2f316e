//! Declarations: qualifiers, variables and procedures.

use ssl_diagnostic::{Diagnostic, ErrorCode};
use ssl_ir::{
    BodySpan, Node, NodeKind, NodeList, ProcFlags, Token, TokenKind, Trigger, Value,
    VarScope, Variable,
};
use tracing::trace;

use super::Qualifiers;
use crate::fold::fold_constant;
use crate::recovery::{skip_block, synchronize, DECL_BOUNDARY};
use crate::references::Mention;
use crate::symbols::{Param, ProcDecl, ProcHeader, Symbol, SymbolTable};
use crate::{ParseError, Parser};

/// Largest element count accepted for an array variable.
const MAX_ARRAY_LEN: i32 = 1 << 16;

impl Parser<'_> {
    /// Collect `import`, `export`, `critical`, `pure` and `inline`.
    pub(crate) fn parse_qualifiers(&mut self) -> Qualifiers {
        let mut quals = Qualifiers::default();
        loop {
            let (flag, word) = match self.cursor.current_kind() {
                TokenKind::Import => (ProcFlags::IMPORT, "import"),
                TokenKind::Export => (ProcFlags::EXPORT, "export"),
                TokenKind::Critical => (ProcFlags::CRITICAL, "critical"),
                TokenKind::Pure => (ProcFlags::PURE, "pure"),
                TokenKind::Inline => (ProcFlags::INLINE, "inline"),
                _ => return quals,
            };
            let pos = self.cursor.advance().pos;
            if quals.flags.contains(flag) {
                self.diagnostics.push(
                    Diagnostic::warning(ErrorCode::W0002)
                        .with_message(format!("duplicate `{word}` qualifier"))
                        .with_label(pos, "already given"),
                );
            }
            quals.flags |= flag;
            quals.written.push((flag, pos));
        }
    }

    /// Report every qualifier outside `allowed` for a declaration of `what`.
    fn reject_qualifiers(&mut self, quals: &Qualifiers, allowed: ProcFlags, what: &str) {
        for &(flag, pos) in &quals.written {
            if allowed.contains(flag) {
                continue;
            }
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E4005)
                    .with_message(format!(
                        "qualifier `{}` is not allowed on {what}",
                        qualifier_word(flag)
                    ))
                    .with_label(pos, "not allowed here"),
            );
        }
    }

    /// `variable a, b[4] := 0;` or `variable begin a; b := 1; end`.
    ///
    /// Inside a procedure body the names are locals and non-constant
    /// initializers are emitted into `out` as stores.
    pub(crate) fn parse_var_decl(
        &mut self,
        quals: &Qualifiers,
        out: &mut NodeList,
    ) -> Result<(), ParseError> {
        let scope = if self.current_proc.is_some() {
            self.reject_qualifiers(quals, ProcFlags::empty(), "local variables");
            VarScope::Local
        } else {
            let both = ProcFlags::IMPORT | ProcFlags::EXPORT;
            self.reject_qualifiers(quals, both, "variables");
            if quals.flags.contains(both) {
                let pos = quals.written.first().map_or_else(|| self.cursor.current_pos(), |q| q.1);
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E4004)
                        .with_message("a variable cannot be both import and export")
                        .with_label(pos, "conflicting qualifiers"),
                );
            }
            if quals.flags.contains(ProcFlags::IMPORT) {
                VarScope::Import
            } else if quals.flags.contains(ProcFlags::EXPORT) {
                VarScope::Export
            } else {
                VarScope::Global
            }
        };

        let open = self.cursor.advance();
        if self.cursor.eat(&TokenKind::Begin) {
            loop {
                if self.cursor.eat(&TokenKind::End) {
                    return Ok(());
                }
                if self.cursor.is_at_end() || self.cursor.check(&TokenKind::Procedure) {
                    return Err(unclosed(open, "variable block"));
                }
                self.parse_var_item(scope, out)?;
                self.cursor.expect(&TokenKind::Semicolon)?;
            }
        }

        loop {
            if let Err(err) = self.parse_var_item(scope, out) {
                self.report(err);
                synchronize(&mut self.cursor, DECL_BOUNDARY);
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(())
    }

    fn parse_var_item(&mut self, scope: VarScope, out: &mut NodeList) -> Result<(), ParseError> {
        let (id, pos) = self.cursor.expect_ident()?;
        let name = self.cursor.text(id);

        let declared = match self.current_proc {
            Some(proc) => self
                .symbols
                .declare_local(proc, name, pos)
                .map(|index| Symbol::Local { proc, index }),
            None => self.symbols.declare_var(name, scope, pos).map(Symbol::Global),
        };
        let symbol = match declared {
            Ok(symbol) => {
                self.refs.record(symbol, pos, Mention::Declaration);
                Some(symbol)
            }
            Err(diag) => {
                self.diagnostics.push(diag);
                None
            }
        };

        let mut array_len = 0;
        if self.cursor.eat(&TokenKind::LBracket) {
            match self.cursor.current_kind() {
                TokenKind::Int(n) if (0..=MAX_ARRAY_LEN).contains(&n) => {
                    self.cursor.advance();
                    array_len = n.unsigned_abs();
                }
                TokenKind::Int(n) if n > MAX_ARRAY_LEN => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("array length {n} exceeds the limit of {MAX_ARRAY_LEN}"),
                        self.cursor.current_pos(),
                    ));
                }
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "array length must be a non-negative integer literal, found `{}`",
                            self.cursor.current_kind().friendly_name()
                        ),
                        self.cursor.current_pos(),
                    )
                    .with_context("expected array length"));
                }
            }
            self.cursor.expect(&TokenKind::RBracket)?;
        }

        let mut init = None;
        if self.cursor.eat(&TokenKind::Assign) || self.cursor.eat(&TokenKind::Eq) {
            let init_pos = self.cursor.current_pos();
            let mut nodes = NodeList::new();
            self.parse_expr(&mut nodes)?;
            init = Some((nodes, init_pos));
        }

        let Some(symbol) = symbol else {
            return Ok(());
        };
        let Some(var) = variable_mut(&mut self.symbols, symbol) else {
            return Ok(());
        };
        var.array_len = array_len;

        let Some((mut nodes, init_pos)) = init else {
            return Ok(());
        };
        if scope == VarScope::Import {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E4006)
                    .with_message(format!("imported variable `{name}` cannot have an initializer"))
                    .with_label(init_pos, "initializer ignored"),
            );
        } else if let Some(value) = fold_constant(&nodes) {
            var.value = value;
            var.initialized = true;
        } else if scope == VarScope::Local && array_len == 0 {
            var.initialized = true;
            out.append(&mut nodes);
            out.push(symbol.to_node(pos));
            out.push(Node::op(NodeKind::Store, init_pos));
        } else {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E1005)
                    .with_message(format!("initializer of `{name}` must be a constant"))
                    .with_label(init_pos, "not a constant expression"),
            );
        }
        Ok(())
    }

    /// `procedure name(params) [in time | when cond] (; | block)`.
    pub(crate) fn parse_procedure(&mut self, quals: &Qualifiers) -> Result<(), ParseError> {
        self.cursor.advance();
        let (id, pos) = self.cursor.expect_ident()?;
        let name = self.cursor.text(id);
        let decl_seq = self.refs.reserve();

        let params = self.parse_params()?;
        let trigger = self.parse_trigger()?;
        let has_body = matches!(
            self.cursor.current_kind(),
            TokenKind::Begin | TokenKind::LBrace
        );
        if !has_body {
            self.cursor.expect(&TokenKind::Semicolon)?;
        }

        let header = ProcHeader {
            name: name.to_string(),
            pos,
            modifiers: quals.flags,
            trigger,
            params: params.iter().map(|(param, _)| param.clone()).collect(),
            has_body,
        };
        match self.symbols.declare_proc(header, &mut self.diagnostics) {
            ProcDecl::Define(idx) => {
                self.refs
                    .record_at(decl_seq, Symbol::Proc(idx), pos, Mention::Declaration);
                for (param, seq) in &params {
                    let local = self.symbols.lookup_local(idx, &param.name);
                    let is_this = local
                        .and_then(|s| variable_mut(&mut self.symbols, s))
                        .is_some_and(|v| v.declared == param.pos);
                    if let (Some(local), true) = (local, is_this) {
                        self.refs
                            .record_at(*seq, local, param.pos, Mention::Declaration);
                    }
                }
                self.parse_body(idx)
            }
            ProcDecl::Declared(idx) => {
                self.refs
                    .record_at(decl_seq, Symbol::Proc(idx), pos, Mention::Declaration);
                Ok(())
            }
            ProcDecl::Rejected(existing) => {
                if let Some(idx) = existing {
                    self.refs
                        .record_at(decl_seq, Symbol::Proc(idx), pos, Mention::Declaration);
                }
                if !has_body {
                    return Ok(());
                }
                // Check the body in a scratch scope; its nodes are dropped.
                let params: Vec<Param> = params.into_iter().map(|(param, _)| param).collect();
                match self
                    .symbols
                    .declare_discarded(name, pos, &params, &mut self.diagnostics)
                {
                    Some(scratch) => self.parse_body(scratch),
                    None => {
                        skip_block(&mut self.cursor);
                        Ok(())
                    }
                }
            }
        }
    }

    /// `( [variable] a, b := 1 )`; each parameter comes with the reference
    /// sequence number of its mention.
    fn parse_params(&mut self) -> Result<Vec<(Param, u32)>, ParseError> {
        let mut params = Vec::new();
        if !self.cursor.eat(&TokenKind::LParen) {
            return Ok(params);
        }

        let mut seen_optional = false;
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                self.cursor.eat(&TokenKind::Variable);
                let (id, pos) = self.cursor.expect_ident()?;
                let seq = self.refs.reserve();

                let mut default = None;
                if self.cursor.eat(&TokenKind::Assign) || self.cursor.eat(&TokenKind::Eq) {
                    let value_pos = self.cursor.current_pos();
                    let mut nodes = NodeList::new();
                    self.parse_expr(&mut nodes)?;
                    default = Some(fold_constant(&nodes).unwrap_or_else(|| {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E1005)
                                .with_message("parameter default must be a constant")
                                .with_label(value_pos, "not a constant expression"),
                        );
                        Value::ZERO
                    }));
                }

                if default.is_some() {
                    seen_optional = true;
                } else if seen_optional {
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E1007)
                            .with_message(format!(
                                "required parameter `{}` follows an optional one",
                                self.cursor.text(id)
                            ))
                            .with_label(pos, "needs a default value"),
                    );
                }

                params.push((
                    Param {
                        name: self.cursor.text(id).to_string(),
                        pos,
                        default,
                    },
                    seq,
                ));
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `in <const int>` or `when <expr>`, at most one of them.
    fn parse_trigger(&mut self) -> Result<Trigger, ParseError> {
        let mut trigger = Trigger::None;
        loop {
            let kw_pos = self.cursor.current_pos();
            let parsed = match self.cursor.current_kind() {
                TokenKind::In => {
                    self.cursor.advance();
                    let mut nodes = NodeList::new();
                    self.parse_expr(&mut nodes)?;
                    if let Some(Value::Int(time)) = fold_constant(&nodes) {
                        Some(Trigger::Timed { time })
                    } else {
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E1006)
                                .with_message("trigger time must be a constant integer")
                                .with_label(kw_pos, "invalid trigger time"),
                        );
                        None
                    }
                }
                TokenKind::When => {
                    self.cursor.advance();
                    let mut condition = NodeList::new();
                    self.parse_expr(&mut condition)?;
                    Some(Trigger::Conditional { condition })
                }
                _ => return Ok(trigger),
            };

            let Some(parsed) = parsed else { continue };
            if matches!(trigger, Trigger::None) {
                trigger = parsed;
            } else {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E4003)
                        .with_message("a procedure can have only one trigger")
                        .with_label(kw_pos, "second trigger"),
                );
            }
        }
    }

    /// Parse the body of procedure `idx` and attach it.
    fn parse_body(&mut self, idx: u32) -> Result<(), ParseError> {
        trace!(
            procedure = self.symbols.name_of(Symbol::Proc(idx)),
            "parsing body"
        );
        let start = self.cursor.current_pos();
        self.current_proc = Some(idx);
        self.loop_depth = 0;

        let mut body = NodeList::new();
        let result = self.parse_block(&mut body);

        self.current_proc = None;
        let end = self.cursor.previous_pos();
        body.push(Node::new(NodeKind::Return, Value::Int(0), end));

        if let Some(proc) = self.symbols.procedure_mut(idx) {
            proc.body = body;
            proc.defined = true;
            proc.body_span = Some(BodySpan { start, end });
        }
        result
    }
}

fn variable_mut(symbols: &mut SymbolTable, symbol: Symbol) -> Option<&mut Variable> {
    match symbol {
        Symbol::Global(idx) => symbols.vars.get_mut(idx as usize),
        Symbol::Local { proc, index } => symbols
            .procedure_mut(proc)?
            .locals
            .get_mut(index as usize),
        Symbol::Proc(_) | Symbol::Builtin(_) => None,
    }
}

/// Error for a block that reaches a new procedure or the end of input.
pub(super) fn unclosed(open: &Token, what: &str) -> ParseError {
    ParseError::new(
        ErrorCode::E1003,
        format!("unclosed {what} opened on line {}", open.pos.line),
        open.pos,
    )
    .with_context(format!("this `{}` is never closed", open.kind.friendly_name()))
}

fn qualifier_word(flag: ProcFlags) -> &'static str {
    if flag == ProcFlags::IMPORT {
        "import"
    } else if flag == ProcFlags::EXPORT {
        "export"
    } else if flag == ProcFlags::CRITICAL {
        "critical"
    } else if flag == ProcFlags::PURE {
        "pure"
    } else {
        "inline"
    }
}
