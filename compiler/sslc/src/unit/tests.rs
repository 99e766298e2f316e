#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use ssl_ir::{ProcFlags, VarScope};

use crate::{parse_str, LayoutError, Scope, SLOT_WIDTH};

const SCRIPT: &str = "\
variable x := 5;
export procedure Foo begin
    x := x + 1;
end
import procedure Bar;
";

#[test]
fn test_counts_and_accessors() {
    let out = parse_str(SCRIPT, "foo.ssl");
    let unit = &out.unit;

    assert_eq!(out.status_code(), 0);
    assert_eq!((unit.num_procs(), unit.num_vars()), (2, 1));
    assert_eq!(unit.var_name(0), Some("x"));
    assert_eq!(unit.var(0).unwrap().scope, VarScope::Global);
    assert_eq!(unit.find_proc("Bar"), Some(1));
    assert_eq!(unit.find_var("Foo"), None);

    let foo = unit.proc(0).unwrap();
    assert_eq!(foo.flags(), ProcFlags::EXPORT);
    let bar = unit.proc(1).unwrap();
    assert_eq!(bar.flags(), ProcFlags::IMPORT);
    assert!(!bar.defined);
    assert!(bar.locals.is_empty());
    assert_eq!(unit.proc(2), None);
}

#[test]
fn test_reference_queries() {
    let out = parse_str(SCRIPT, "foo.ssl");
    let unit = &out.unit;

    let refs = unit.var_refs(0).unwrap();
    assert_eq!(refs.len(), unit.var(0).unwrap().num_refs());
    assert_eq!(
        refs.iter().map(|r| r.line).collect::<Vec<_>>(),
        [1, 3, 3]
    );
    assert!(refs.iter().all(|r| r.file.to_str() == Some("foo.ssl")));

    let foo = unit.proc(0).unwrap();
    let span = foo.body_span.unwrap();
    let inside = refs.iter().filter(|r| r.line > span.start.line && r.line < span.end.line);
    assert_eq!(inside.count(), 2);
    assert_eq!(unit.proc_refs(5), None);
}

#[test]
fn test_namespaces() {
    let out = parse_str(
        "variable a := 5;\n\
         variable b[2] := 7;\n\
         variable s := \"hi\";\n\
         procedure p(variable n, variable m := 3) begin end\n\
         procedure q begin end\n",
        "ns.ssl",
    );
    let unit = &out.unit;
    assert_eq!(out.diagnostics.len(), 0);

    assert_eq!(unit.namespace_size(), (4 * SLOT_WIDTH) as i64);
    let bytes = unit.namespace().unwrap();
    assert_eq!(bytes.len(), 4 * SLOT_WIDTH);
    assert_eq!(&bytes[0..4], 5i32.to_le_bytes());
    assert_eq!(&bytes[4..12], [7, 0, 0, 0, 7, 0, 0, 0]);
    let hi = unit.string_pool().find("hi").unwrap();
    assert_eq!(&bytes[12..16], hi.offset().to_le_bytes());

    assert_eq!(unit.proc_namespace_size(0), 8);
    assert_eq!(&unit.proc_namespace(0).unwrap()[4..8], 3i32.to_le_bytes());
    assert_eq!(unit.proc_var_name(0, 1), Some("m"));

    assert_eq!(unit.proc_namespace_size(1), -1);
    assert_eq!(
        unit.proc_namespace(1),
        Err(LayoutError::Empty(Scope::Procedure(1)))
    );
    assert_eq!(unit.proc_namespace(9), Err(LayoutError::UnknownProcedure(9)));
}

#[test]
fn test_empty_global_scope() {
    let out = parse_str("procedure p begin end\n", "empty.ssl");
    assert_eq!(out.unit.namespace_size(), -1);
    assert_eq!(out.unit.namespace(), Err(LayoutError::Empty(Scope::Global)));
}

#[test]
fn test_stringspace_holds_each_text_once() {
    let out = parse_str(
        "variable greeting := \"hi\";\n\
         procedure p begin\n\
             display_msg(\"hi\");\n\
             display_msg(\"bye\");\n\
             greeting := \"hi\";\n\
         end\n",
        "s.ssl",
    );
    let unit = &out.unit;
    let dump = unit.stringspace();
    assert_eq!(dump.len(), unit.stringspace_size());

    let texts: Vec<&[u8]> = dump.split(|b| *b == 0).filter(|s| !s.is_empty()).collect();
    let expected: [&[u8]; 4] = [b"greeting", b"hi", b"p", b"bye"];
    assert_eq!(texts, expected);
}

#[test]
fn test_reparse_is_deterministic() {
    let first = parse_str(SCRIPT, "foo.ssl");
    let second = parse_str(SCRIPT, "foo.ssl");
    assert_eq!(first.unit.namespace(), second.unit.namespace());
    assert_eq!(first.unit.stringspace(), second.unit.stringspace());
}

#[test]
fn test_unit_serializes() {
    let out = parse_str(SCRIPT, "foo.ssl");
    let bytes = bincode::serialize(&out.unit).unwrap();
    let back: crate::CompilationUnit = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back.num_procs(), 2);
    assert_eq!(back.namespace(), out.unit.namespace());
}
