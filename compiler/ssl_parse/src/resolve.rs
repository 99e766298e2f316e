//! Forward-reference resolution.
//!
//! Phase one runs during parsing: a name that is not yet declared becomes a
//! placeholder keyed by (name, enclosing procedure) and the node is emitted
//! as `Ident(placeholder)`. Phase two runs once the whole unit is parsed and
//! moves every placeholder from `Unresolved` to either `Resolved` or
//! `Errored`, then rewrites node lists and checks how the resolved symbols
//! are used.

use rustc_hash::FxHashMap;
use ssl_diagnostic::{undeclared_identifier, Diagnostic, DiagnosticQueue, ErrorCode};
use ssl_ir::{Node, NodeKind, NodeList, SourcePos, Value};
use tracing::debug;

use crate::builtins;
use crate::references::{Mention, ReferenceTracker};
use crate::symbols::{index_of, payload, Symbol, SymbolTable};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PlaceholderState {
    Unresolved,
    Resolved(Symbol),
    Errored,
}

/// A name used before it was declared.
#[derive(Clone, Debug)]
pub struct Placeholder {
    pub name: Box<str>,
    /// Procedure whose body mentions the name; `None` for top-level code
    /// and trigger conditions.
    pub context: Option<u32>,
    pub state: PlaceholderState,
    /// Reserved reference sequence number and position of each mention.
    pub sites: Vec<(u32, SourcePos)>,
}

#[derive(Clone, Debug, Default)]
pub struct ForwardRefs {
    placeholders: Vec<Placeholder>,
    index: FxHashMap<(Box<str>, Option<u32>), u32>,
}

impl ForwardRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for `name` in `context`, adding this mention to it.
    pub fn placeholder(&mut self, name: &str, context: Option<u32>, seq: u32, pos: SourcePos) -> u32 {
        let key = (Box::from(name), context);
        let idx = *self.index.entry(key).or_insert_with(|| {
            let idx = index_of(self.placeholders.len());
            self.placeholders.push(Placeholder {
                name: name.into(),
                context,
                state: PlaceholderState::Unresolved,
                sites: Vec::new(),
            });
            idx
        });
        self.placeholders[idx as usize].sites.push((seq, pos));
        idx
    }

    pub fn get(&self, idx: u32) -> Option<&Placeholder> {
        self.placeholders.get(idx as usize)
    }

    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Phase two: resolve every placeholder against the final tables.
    ///
    /// Resolved mentions are recorded as uses; each name that stays
    /// undeclared is reported once, at its earliest mention.
    pub fn resolve_all(
        &mut self,
        symbols: &SymbolTable,
        refs: &mut ReferenceTracker,
        diags: &mut DiagnosticQueue,
    ) {
        let mut errored = 0usize;
        for ph in &mut self.placeholders {
            if ph.state != PlaceholderState::Unresolved {
                continue;
            }
            match symbols.lookup(&ph.name, ph.context) {
                Some(symbol) => {
                    for &(seq, pos) in &ph.sites {
                        refs.record_at(seq, symbol, pos, Mention::Use);
                    }
                    ph.state = PlaceholderState::Resolved(symbol);
                }
                None => {
                    if let Some(&(_, first)) = ph.sites.iter().min_by_key(|(seq, _)| *seq) {
                        diags.push(undeclared_identifier(first, &ph.name));
                    }
                    ph.state = PlaceholderState::Errored;
                    errored += 1;
                }
            }
        }
        debug!(
            placeholders = self.placeholders.len(),
            errored, "forward references resolved"
        );
    }

    /// Replace `Ident` nodes by their resolution and make bare procedure
    /// names into zero-argument calls.
    pub fn rewrite(&self, nodes: &NodeList) -> NodeList {
        let mut out = NodeList::new();
        let slice = nodes.as_slice();
        for (i, node) in slice.iter().enumerate() {
            let node = self.resolve_node(*node);
            out.push(node);

            let next = slice.get(i + 1).map(|n| n.kind);
            let callable = matches!(node.kind, NodeKind::Proc | NodeKind::Builtin);
            let consumed = matches!(
                next,
                Some(NodeKind::Call | NodeKind::ProcAddr | NodeKind::Store | NodeKind::StoreIndex)
            );
            if callable && !consumed {
                out.push(Node::new(NodeKind::Call, Value::Int(0), node.pos));
            }
        }
        out
    }

    fn resolve_node(&self, node: Node) -> Node {
        if node.kind != NodeKind::Ident {
            return node;
        }
        let state = node
            .value
            .as_int()
            .and_then(|idx| u32::try_from(idx).ok())
            .and_then(|idx| self.get(idx))
            .map(|ph| ph.state);
        match state {
            Some(PlaceholderState::Resolved(symbol)) => symbol.to_node(node.pos),
            _ => Node::new(NodeKind::Error, node.value, node.pos),
        }
    }
}

/// Check calls, stores and `@` on resolved nodes.
///
/// The operand of each of these is the node right before it: calls are
/// emitted as `args.. callee Call`, stores as `value [index] target Store`.
pub fn check_uses(
    nodes: &NodeList,
    context: Option<u32>,
    symbols: &SymbolTable,
    diags: &mut DiagnosticQueue,
) {
    let slice = nodes.as_slice();
    for (i, node) in slice.iter().enumerate() {
        let Some(operand) = i.checked_sub(1).and_then(|j| slice.get(j)) else {
            continue;
        };
        let Some(symbol) = node_symbol(operand, context) else {
            continue;
        };
        let name = symbols.name_of(symbol);

        match node.kind {
            NodeKind::Call => {
                let argc = node.value.as_int().and_then(|v| u32::try_from(v).ok()).unwrap_or(0);
                if let Some(diag) = check_call(symbol, name, argc, operand.pos, symbols) {
                    diags.push(diag);
                }
            }
            NodeKind::Store | NodeKind::StoreIndex
                if matches!(symbol, Symbol::Proc(_) | Symbol::Builtin(_)) =>
            {
                diags.push(
                    Diagnostic::error(ErrorCode::E6003)
                        .with_message(format!("cannot assign to procedure `{name}`"))
                        .with_label(operand.pos, "not a variable"),
                );
            }
            NodeKind::ProcAddr if !matches!(symbol, Symbol::Proc(_)) => {
                diags.push(
                    Diagnostic::error(ErrorCode::E6002)
                        .with_message(format!("`@{name}` does not name a script procedure"))
                        .with_label(operand.pos, "expected a procedure"),
                );
            }
            _ => {}
        }
    }
}

fn check_call(
    symbol: Symbol,
    name: &str,
    argc: u32,
    pos: SourcePos,
    symbols: &SymbolTable,
) -> Option<Diagnostic> {
    let (min, max, declared) = match symbol {
        Symbol::Proc(idx) => {
            let proc = symbols.procs.get(idx as usize)?;
            (proc.min_args, proc.num_args, Some(proc.declared))
        }
        Symbol::Builtin(idx) => {
            let builtin = builtins::get(idx as usize)?;
            (builtin.min_args, builtin.max_args, None)
        }
        Symbol::Global(_) | Symbol::Local { .. } => {
            return Some(
                Diagnostic::error(ErrorCode::E6002)
                    .with_message(format!("`{name}` is a variable, not a procedure"))
                    .with_label(pos, "called here"),
            );
        }
    };
    if (min..=max).contains(&argc) {
        return None;
    }

    let expected = if min == max {
        format!("{max}")
    } else {
        format!("{min} to {max}")
    };
    let mut diag = Diagnostic::error(ErrorCode::E6001)
        .with_message(format!(
            "`{name}` takes {expected} argument{} but {argc} {} supplied",
            if max == 1 { "" } else { "s" },
            if argc == 1 { "was" } else { "were" }
        ))
        .with_label(pos, "wrong number of arguments");
    if let Some(declared) = declared {
        diag = diag.with_secondary_label(declared, "declared here");
    }
    Some(diag)
}

fn node_symbol(node: &Node, context: Option<u32>) -> Option<Symbol> {
    let idx = u32::try_from(node.value.as_int()?).ok()?;
    match node.kind {
        NodeKind::GlobalVar => Some(Symbol::Global(idx)),
        NodeKind::LocalVar => context.map(|proc| Symbol::Local { proc, index: idx }),
        NodeKind::Proc => Some(Symbol::Proc(idx)),
        NodeKind::Builtin => Some(Symbol::Builtin(idx)),
        _ => None,
    }
}

/// Payload for an `Ident` node naming placeholder `idx`.
pub(crate) fn placeholder_node(idx: u32, pos: SourcePos) -> Node {
    Node::new(NodeKind::Ident, Value::Int(payload(idx)), pos)
}

#[cfg(test)]
mod tests;
