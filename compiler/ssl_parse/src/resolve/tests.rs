#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::symbols::{ProcDecl, ProcHeader};
use ssl_ir::{FileId, ProcFlags, Trigger, VarScope};

fn at(line: u32) -> SourcePos {
    SourcePos::new(FileId::PRIMARY, line, 1)
}

fn define(table: &mut SymbolTable, name: &str, params: usize) -> u32 {
    let mut diags = DiagnosticQueue::new();
    let header = ProcHeader {
        name: name.to_string(),
        pos: at(1),
        modifiers: ProcFlags::empty(),
        trigger: Trigger::None,
        params: (0..params)
            .map(|i| crate::symbols::Param {
                name: format!("a{i}"),
                pos: at(1),
                default: None,
            })
            .collect(),
        has_body: true,
    };
    match table.declare_proc(header, &mut diags) {
        ProcDecl::Define(idx) => idx,
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_placeholders_are_keyed_by_context() {
    let mut fwd = ForwardRefs::new();
    let a = fwd.placeholder("later", None, 0, at(1));
    let b = fwd.placeholder("later", None, 1, at(2));
    let c = fwd.placeholder("later", Some(0), 2, at(3));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(fwd.len(), 2);
    assert_eq!(fwd.get(a).unwrap().sites.len(), 2);
}

#[test]
fn test_resolve_records_references_in_order() {
    let mut table = SymbolTable::new();
    let mut refs = ReferenceTracker::new();
    let mut diags = DiagnosticQueue::new();
    let mut fwd = ForwardRefs::new();

    let seq = refs.reserve();
    let ph = fwd.placeholder("foo", None, seq, at(2));
    let foo = define(&mut table, "foo", 0);
    refs.record(Symbol::Proc(foo), at(5), Mention::Declaration);

    fwd.resolve_all(&table, &mut refs, &mut diags);

    assert!(diags.is_empty());
    assert_eq!(fwd.get(ph).unwrap().state, PlaceholderState::Resolved(Symbol::Proc(foo)));
    let lines: Vec<u32> = refs.references_of(Symbol::Proc(foo)).iter().map(|r| r.line).collect();
    assert_eq!(lines, [2, 5]);
}

#[test]
fn test_undeclared_reported_once_at_earliest_site() {
    let table = SymbolTable::new();
    let mut refs = ReferenceTracker::new();
    let mut diags = DiagnosticQueue::new();
    let mut fwd = ForwardRefs::new();

    fwd.placeholder("ghost", None, 4, at(9));
    fwd.placeholder("ghost", None, 1, at(3));
    fwd.resolve_all(&table, &mut refs, &mut diags);

    let reported: Vec<_> = diags.peek().map(|d| (d.code, d.pos().line)).collect();
    assert_eq!(reported, [(ErrorCode::E2001, 3)]);
    assert_eq!(fwd.get(0).unwrap().state, PlaceholderState::Errored);
}

#[test]
fn test_rewrite_replaces_idents_and_adds_implicit_calls() {
    let mut table = SymbolTable::new();
    let mut refs = ReferenceTracker::new();
    let mut diags = DiagnosticQueue::new();
    let mut fwd = ForwardRefs::new();
    define(&mut table, "tick", 0);

    let p = fwd.placeholder("tick", None, 0, at(1));
    let missing = fwd.placeholder("nope", None, 1, at(1));
    fwd.resolve_all(&table, &mut refs, &mut diags);

    let nodes: NodeList = [placeholder_node(p, at(1)), placeholder_node(missing, at(1))]
        .into_iter()
        .collect();
    let rewritten = fwd.rewrite(&nodes);

    assert_eq!(
        rewritten.kinds(),
        vec![NodeKind::Proc, NodeKind::Call, NodeKind::Error]
    );
}

#[test]
fn test_check_uses_reports_arity_and_targets() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let two = define(&mut table, "two", 2);
    table.declare_var("counter", VarScope::Global, at(1)).unwrap();

    let int = |v| Node::new(NodeKind::Int, Value::Int(v), at(4));
    let nodes: NodeList = [
        int(1),
        Symbol::Proc(two).to_node(at(4)),
        Node::new(NodeKind::Call, Value::Int(1), at(4)),
        Node::op(NodeKind::Pop, at(4)),
        int(2),
        Symbol::Proc(two).to_node(at(5)),
        Node::op(NodeKind::Store, at(5)),
        Symbol::Global(0).to_node(at(6)),
        Node::new(NodeKind::Call, Value::Int(0), at(6)),
    ]
    .into_iter()
    .collect();

    check_uses(&nodes, None, &table, &mut diags);

    let codes: Vec<_> = diags.peek().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E6001, ErrorCode::E6003, ErrorCode::E6002]);
}
