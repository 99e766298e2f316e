#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ssl_ir::FileId;

fn at(line: u32) -> SourcePos {
    SourcePos::new(FileId::PRIMARY, line, 1)
}

fn header(name: &str, line: u32, params: usize, has_body: bool) -> ProcHeader {
    ProcHeader {
        name: name.to_string(),
        pos: at(line),
        modifiers: ProcFlags::empty(),
        trigger: Trigger::None,
        params: (0..params)
            .map(|i| Param {
                name: format!("p{i}"),
                pos: at(line),
                default: None,
            })
            .collect(),
        has_body,
    }
}

fn codes(diags: &DiagnosticQueue) -> Vec<ErrorCode> {
    diags.peek().map(|d| d.code).collect()
}

#[test]
fn test_duplicate_global_carries_both_lines() {
    let mut table = SymbolTable::new();
    table.declare_var("y", VarScope::Global, at(1)).unwrap();
    let err = table.declare_var("y", VarScope::Global, at(2)).unwrap_err();

    assert_eq!(err.code, ErrorCode::E3001);
    assert!(err.message.contains("line 2"));
    assert!(err.message.contains("line 1"));
    assert_eq!(table.vars.len(), 1);
}

#[test]
fn test_variable_and_procedure_share_names() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_var("door", VarScope::Global, at(1)).unwrap();
    let decl = table.declare_proc(header("door", 2, 0, true), &mut diags);

    assert_eq!(decl, ProcDecl::Rejected(None));
    assert_eq!(codes(&diags), [ErrorCode::E3001]);
}

#[test]
fn test_discarded_scope_resolves_its_own_locals() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_var("door", VarScope::Global, at(1)).unwrap();
    let params = header("door", 2, 2, true).params;
    let scratch = table.declare_discarded("door", at(2), &params, &mut diags).unwrap();

    assert!(diags.is_empty());
    assert!(table.procs.is_empty());
    assert_eq!(table.procedure(scratch).unwrap().num_args, 2);
    assert_eq!(
        table.lookup("p1", Some(scratch)),
        Some(Symbol::Local { proc: scratch, index: 1 })
    );
    assert_eq!(table.lookup("door", Some(scratch)), Some(Symbol::Global(0)));
    assert_eq!(table.discarded_bodies().count(), 1);
}

#[test]
fn test_local_shadows_global() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_var("x", VarScope::Global, at(1)).unwrap();
    let ProcDecl::Define(p) = table.declare_proc(header("foo", 2, 0, true), &mut diags) else {
        panic!("expected definition");
    };
    let local = table.declare_local(p, "x", at(3)).unwrap();

    assert_eq!(table.lookup("x", Some(p)), Some(Symbol::Local { proc: p, index: local }));
    assert_eq!(table.lookup("x", None), Some(Symbol::Global(0)));
    assert!(table.declare_local(p, "x", at(4)).is_err());
}

#[test]
fn test_lookup_falls_back_to_builtins() {
    let table = SymbolTable::new();
    let Some(Symbol::Builtin(idx)) = table.lookup("random", None) else {
        panic!("random should be a builtin");
    };
    assert_eq!(table.name_of(Symbol::Builtin(idx)), "random");
    assert_eq!(table.lookup("nothing_here", None), None);
}

#[test]
fn test_user_procedure_shadows_builtin() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_proc(header("random", 1, 2, true), &mut diags);
    assert_eq!(table.lookup("random", None), Some(Symbol::Proc(0)));
}

#[test]
fn test_forward_declaration_then_definition() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();

    let decl = table.declare_proc(header("foo", 1, 2, false), &mut diags);
    let def = table.declare_proc(header("foo", 9, 2, true), &mut diags);

    assert_eq!(decl, ProcDecl::Declared(0));
    assert_eq!(def, ProcDecl::Define(0));
    assert!(diags.is_empty());
    assert_eq!(table.procs.len(), 1);
    assert_eq!(table.procs[0].num_args, 2);
    assert_eq!(table.procs[0].declared.line, 1);
}

#[test]
fn test_arity_mismatch_between_declaration_and_definition() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_proc(header("foo", 1, 1, false), &mut diags);
    table.declare_proc(header("foo", 5, 2, true), &mut diags);

    assert_eq!(codes(&diags), [ErrorCode::E3002]);
    let diag = diags.peek().next().unwrap();
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(table.procs[0].num_args, 2);
}

#[test]
fn test_second_definition_is_rejected() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let ProcDecl::Define(p) = table.declare_proc(header("foo", 1, 0, true), &mut diags) else {
        panic!("expected definition");
    };
    table.procs[p as usize].defined = true;

    let again = table.declare_proc(header("foo", 4, 0, true), &mut diags);
    assert_eq!(again, ProcDecl::Rejected(Some(p)));
    assert_eq!(codes(&diags), [ErrorCode::E3001]);
}

#[test]
fn test_import_with_body_is_a_scope_violation() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let mut h = header("baz", 1, 0, true);
    h.modifiers = ProcFlags::IMPORT;

    let decl = table.declare_proc(h, &mut diags);
    assert_eq!(decl, ProcDecl::Define(0));
    assert_eq!(codes(&diags), [ErrorCode::E4001]);
    assert!(!table.procs[0].is_import());
}

#[test]
fn test_import_and_export_conflict() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let mut h = header("both", 1, 0, false);
    h.modifiers = ProcFlags::IMPORT | ProcFlags::EXPORT;
    table.declare_proc(h, &mut diags);

    assert_eq!(codes(&diags), [ErrorCode::E4004]);
    assert!(table.procs[0].is_import());
    assert!(!table.procs[0].is_export());
}

#[test]
fn test_trigger_conflict() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let mut decl = header("tick", 1, 0, false);
    decl.trigger = Trigger::Timed { time: 10 };
    table.declare_proc(decl, &mut diags);

    let mut def = header("tick", 3, 0, true);
    def.trigger = Trigger::Conditional {
        condition: ssl_ir::NodeList::new(),
    };
    table.declare_proc(def, &mut diags);

    assert_eq!(codes(&diags), [ErrorCode::E4003]);
    assert_eq!(table.procs[0].time(), 10);
}

#[test]
fn test_definition_supplies_trigger() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_proc(header("tick", 1, 0, false), &mut diags);
    let mut def = header("tick", 3, 0, true);
    def.trigger = Trigger::Timed { time: 25 };
    table.declare_proc(def, &mut diags);

    assert!(diags.is_empty());
    assert_eq!(table.procs[0].flags(), ProcFlags::TIMED);
}

#[test]
fn test_min_args_counts_leading_required_params() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    let mut h = header("opt", 1, 3, true);
    h.params[2].default = Some(Value::Int(7));
    table.declare_proc(h, &mut diags);

    let proc = &table.procs[0];
    assert_eq!((proc.num_args, proc.min_args), (3, 2));
    assert_eq!(proc.locals[2].value, Value::Int(7));
    assert!(proc.locals[2].initialized);
}

#[test]
fn test_undefined_procedures_at_end_of_unit() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();

    let mut exported = header("shown", 1, 0, false);
    exported.modifiers = ProcFlags::EXPORT;
    table.declare_proc(exported, &mut diags);
    table.declare_proc(header("forgotten", 2, 0, false), &mut diags);
    let mut imported = header("elsewhere", 3, 0, false);
    imported.modifiers = ProcFlags::IMPORT;
    table.declare_proc(imported, &mut diags);

    table.check_definitions(&mut diags);

    assert_eq!(codes(&diags), [ErrorCode::E4002, ErrorCode::W0001]);
    assert!(!table.procs[0].is_export());
    assert_eq!(diags.error_count(), 1);
}

#[test]
fn test_names_live_in_the_right_pools() {
    let mut table = SymbolTable::new();
    let mut diags = DiagnosticQueue::new();
    table.declare_var("g", VarScope::Export, at(1)).unwrap();
    let ProcDecl::Define(p) = table.declare_proc(header("f", 2, 1, true), &mut diags) else {
        panic!("expected definition");
    };

    let names: Vec<&str> = table.stringspace.iter().map(|(_, s)| s).collect();
    assert_eq!(names, ["g", "f"]);
    let proc = &table.procs[p as usize];
    assert_eq!(proc.namelist.id(), PoolId::Namelist(p));
    assert_eq!(proc.namelist.lookup(proc.locals[0].name), "p0");
}
