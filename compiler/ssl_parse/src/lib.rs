//! Recursive descent parser for SSL scripts.
//!
//! Consumes the spliced token stream from [`SourceLoader`] and produces
//! postfix [`NodeList`] bodies for every procedure plus the implicit
//! top-level `main` sequence, together with the global and per-procedure
//! symbol tables and their cross-reference lists.
//!
//! Name resolution runs in two phases. While parsing, a name already in
//! scope binds immediately; anything else becomes a placeholder keyed by
//! (name, enclosing procedure). After the last token every placeholder is
//! resolved against the final tables, or reported once as undeclared.

mod builtins;
mod cursor;
mod error;
mod fold;
mod grammar;
mod recovery;
mod references;
mod resolve;
mod source;
mod symbols;

use std::path::Path;

pub use builtins::{Builtin, BUILTINS};
pub use cursor::Cursor;
pub use error::{lex_error_to_diagnostic, ParseError};
pub use recovery::{synchronize, TokenSet};
pub use source::{LoadedSource, SourceLoader, DEFAULT_MAX_INCLUDE_DEPTH};
pub use symbols::Symbol;

use ssl_diagnostic::{Diagnostic, DiagnosticQueue};
use ssl_ir::{
    Node, NodeList, Procedure, SourceMap, SourcePos, StrId, StringPool, Token, TokenKind, Trigger,
    Variable,
};
use tracing::debug;

use crate::recovery::{ITEM_START, STMT_BOUNDARY};
use crate::references::{Mention, ReferenceTracker};
use crate::resolve::{check_uses, placeholder_node, ForwardRefs};
use crate::symbols::{index_of, SymbolTable};

/// Everything one parse produced.
#[derive(Debug)]
pub struct ParsedModule {
    /// Named procedures in declaration order.
    pub procs: Vec<Procedure>,
    /// Global, import and export variables in declaration order.
    pub vars: Vec<Variable>,
    /// Global identifiers and string literals.
    pub stringspace: StringPool,
    /// Top-level statements outside any procedure.
    pub main: NodeList,
    pub sources: SourceMap,
}

/// Result of parsing: the module and every diagnostic, sorted by position.
#[derive(Debug)]
pub struct ParseOutput {
    pub module: ParsedModule,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    symbols: SymbolTable,
    refs: ReferenceTracker,
    forward: ForwardRefs,
    diagnostics: DiagnosticQueue,
    main: NodeList,
    /// Procedure whose body is being parsed.
    current_proc: Option<u32>,
    /// Enclosing `while`/`for` loops in the current body.
    loop_depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a token stream ending in `Eof`.
    pub fn new(tokens: &'a [Token], scratch: &'a StringPool) -> Self {
        Parser {
            cursor: Cursor::new(tokens, scratch),
            symbols: SymbolTable::new(),
            refs: ReferenceTracker::new(),
            forward: ForwardRefs::new(),
            diagnostics: DiagnosticQueue::new(),
            main: NodeList::new(),
            current_proc: None,
            loop_depth: 0,
        }
    }

    fn report(&mut self, err: ParseError) {
        self.diagnostics.push(err.to_diagnostic());
    }

    /// Skip to the end of a malformed statement.
    fn recover_stmt(&mut self) {
        synchronize(&mut self.cursor, STMT_BOUNDARY);
        self.cursor.eat(&TokenKind::Semicolon);
    }

    /// Skip to the end of a malformed top-level item.
    fn recover_item(&mut self) {
        synchronize(&mut self.cursor, STMT_BOUNDARY.union(ITEM_START));
        self.cursor.eat(&TokenKind::Semicolon);
    }

    /// Node for a mention of an identifier in an expression or as an
    /// assignment target.
    ///
    /// A name already in scope binds now; otherwise the mention is parked
    /// on a placeholder with a reserved reference slot so references stay
    /// in source order once it resolves.
    fn mention(&mut self, id: StrId, pos: SourcePos) -> Node {
        let name = self.cursor.text(id);
        let found = match self.current_proc {
            Some(proc) => self
                .symbols
                .lookup_local(proc, name)
                .or_else(|| self.symbols.lookup_global(name)),
            None => self.symbols.lookup_global(name),
        };
        if let Some(symbol) = found {
            self.refs.record(symbol, pos, Mention::Use);
            return symbol.to_node(pos);
        }
        let seq = self.refs.reserve();
        let idx = self.forward.placeholder(name, self.current_proc, seq, pos);
        placeholder_node(idx, pos)
    }

    /// Parse the whole token stream.
    pub fn parse_module(mut self, sources: SourceMap) -> ParseOutput {
        self.parse_items();
        self.finish(sources)
    }

    /// End-of-unit checks, phase-two resolution and reference distribution.
    fn finish(mut self, sources: SourceMap) -> ParseOutput {
        self.symbols.check_definitions(&mut self.diagnostics);
        self.forward
            .resolve_all(&self.symbols, &mut self.refs, &mut self.diagnostics);

        let main = self.forward.rewrite(&self.main);
        check_uses(&main, None, &self.symbols, &mut self.diagnostics);

        for idx in 0..self.symbols.procs.len() {
            let body = self.forward.rewrite(&self.symbols.procs[idx].body);
            check_uses(&body, Some(index_of(idx)), &self.symbols, &mut self.diagnostics);

            let condition = self.symbols.procs[idx]
                .condition()
                .map(|cond| self.forward.rewrite(cond));
            if let Some(cond) = &condition {
                check_uses(cond, None, &self.symbols, &mut self.diagnostics);
            }

            let proc = &mut self.symbols.procs[idx];
            proc.body = body;
            if let (Some(cond), Trigger::Conditional { condition }) = (condition, &mut proc.trigger)
            {
                *condition = cond;
            }
        }

        for (scope, body) in self.symbols.discarded_bodies() {
            let body = self.forward.rewrite(body);
            check_uses(&body, Some(scope), &self.symbols, &mut self.diagnostics);
        }

        let SymbolTable {
            stringspace,
            mut vars,
            mut procs,
            ..
        } = self.symbols;
        self.refs.distribute(&mut vars, &mut procs);

        debug!(
            procs = procs.len(),
            vars = vars.len(),
            main = main.len(),
            errors = self.diagnostics.error_count(),
            "parse finished"
        );
        ParseOutput {
            module: ParsedModule {
                procs,
                vars,
                stringspace,
                main,
                sources,
            },
            diagnostics: self.diagnostics.flush(),
        }
    }
}

/// Parse a loaded token stream. Lexer and include diagnostics come along
/// with the parser's own.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: LoadedSource) -> ParseOutput {
    let LoadedSource {
        tokens,
        sources,
        scratch,
        diagnostics,
    } = source;
    let mut parser = Parser::new(&tokens, &scratch);
    parser.diagnostics = diagnostics;
    parser.parse_module(sources)
}

/// Parse in-memory text with no include directory.
pub fn parse_str(text: &str, display_path: &str) -> ParseOutput {
    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str(text, Path::new(display_path));
    parse(loaded)
}

#[cfg(test)]
mod tests;
