//! Grammar Modules
//!
//! Parsing implementations for SSL constructs.
//!
//! # Organization
//!
//! Each module extends `Parser` with methods for specific grammar productions:
//!
//! - [`decl`]: Qualifiers, variable declarations, procedure headers and bodies
//! - [`stmt`]: Blocks and statements, including assignment lowering
//! - [`expr`]: Expressions (precedence climbing, calls, indexing, literals)
//!
//! # Design
//!
//! Productions emit postfix nodes straight into the `NodeList` they are
//! handed and return `Err(ParseError)` on the first problem. Block and
//! top-level loops turn the error into a diagnostic, drop the partially
//! emitted statement, and synchronize on a statement boundary.

mod decl;
mod expr;
mod stmt;

use ssl_ir::{ProcFlags, SourcePos, TokenKind};

use crate::{ParseError, Parser};

/// Qualifier keywords written in front of a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Qualifiers {
    pub flags: ProcFlags,
    /// Each qualifier as written, for position-accurate diagnostics.
    pub written: Vec<(ProcFlags, SourcePos)>,
}

impl Qualifiers {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

impl Parser<'_> {
    /// Parse top-level items until end of input.
    pub(crate) fn parse_items(&mut self) {
        while !self.cursor.is_at_end() {
            let start = self.cursor.position();
            let mark = self.main.len();

            if let Err(err) = self.parse_item() {
                self.main.truncate(mark);
                self.report(err);
                self.recover_item();
            }

            // Always make progress, even on a token nothing can start with.
            if self.cursor.position() == start {
                self.cursor.advance();
            }
        }
    }

    fn parse_item(&mut self) -> Result<(), ParseError> {
        let quals = self.parse_qualifiers();
        match self.cursor.current_kind() {
            TokenKind::Procedure => self.parse_procedure(&quals),
            TokenKind::Variable => {
                let mut main = std::mem::take(&mut self.main);
                let result = self.parse_var_decl(&quals, &mut main);
                self.main = main;
                result
            }
            _ if !quals.is_empty() => Err(self
                .cursor
                .make_expect_error("`variable` or `procedure`")),
            _ => {
                let mut main = std::mem::take(&mut self.main);
                let result = self.parse_statement(&mut main);
                self.main = main;
                result
            }
        }
    }
}
