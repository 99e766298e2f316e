#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::fs;

fn idents(loaded: &LoadedSource) -> Vec<String> {
    loaded
        .tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::Ident(id) => Some(loaded.scratch.lookup(id).to_string()),
            _ => None,
        })
        .collect()
}

fn codes(loaded: &LoadedSource) -> Vec<ErrorCode> {
    loaded.diagnostics.peek().map(|d| d.code).collect()
}

#[test]
fn test_include_is_spliced_in_place() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("define.h"), "b c").unwrap();
    let main = dir.path().join("main.ssl");

    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str("a\n#include \"define.h\"\nd", &main);

    assert_eq!(idents(&loaded), ["a", "b", "c", "d"]);
    assert_eq!(loaded.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert_eq!(loaded.sources.len(), 2);

    let b = loaded.tokens[1].pos;
    assert_ne!(b.file, FileId::PRIMARY);
    assert_eq!(b.line, 1);
    assert_eq!(loaded.tokens[3].pos.file, FileId::PRIMARY);
    assert!(loaded.diagnostics.is_empty());
}

#[test]
fn test_include_dir_is_searched_first() {
    let dir = tempfile::tempdir().unwrap();
    let headers = dir.path().join("headers");
    fs::create_dir(&headers).unwrap();
    fs::write(headers.join("x.h"), "from_include_dir").unwrap();
    fs::write(dir.path().join("x.h"), "from_script_dir").unwrap();

    let loaded = SourceLoader::new(Some(&headers), DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str("#include \"x.h\"", &dir.path().join("main.ssl"));

    assert_eq!(idents(&loaded), ["from_include_dir"]);
}

#[test]
fn test_missing_include_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str("a;\n#include \"nope.h\"\nb;", &dir.path().join("main.ssl"));

    assert_eq!(idents(&loaded), ["a", "b"]);
    assert_eq!(codes(&loaded), [ErrorCode::E5001]);
    let diag = loaded.diagnostics.peek().next().unwrap();
    assert_eq!(diag.pos().line, 2);
}

#[test]
fn test_include_cycle_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.h"), "x\n#include \"b.h\"").unwrap();
    fs::write(dir.path().join("b.h"), "y\n#include \"a.h\"").unwrap();

    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str("#include \"a.h\"", &dir.path().join("main.ssl"));

    assert_eq!(idents(&loaded), ["x", "y"]);
    assert_eq!(codes(&loaded), [ErrorCode::E5002]);
}

#[test]
fn test_include_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    for level in 0..4 {
        let body = format!("l{level}\n#include \"h{}.h\"", level + 1);
        fs::write(dir.path().join(format!("h{level}.h")), body).unwrap();
    }
    fs::write(dir.path().join("h4.h"), "l4").unwrap();

    let loaded = SourceLoader::new(None, 2).load_str("#include \"h0.h\"", &dir.path().join("m.ssl"));

    assert_eq!(idents(&loaded), ["l0", "l1"]);
    assert_eq!(codes(&loaded), [ErrorCode::E5003]);
}

#[test]
fn test_lex_errors_become_diagnostics() {
    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_str("x := $;\n#define Y", Path::new("m.ssl"));
    assert_eq!(codes(&loaded), [ErrorCode::E1008, ErrorCode::E1010]);
}

#[test]
fn test_unreadable_primary_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.ssl");
    let result = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH).load_file(&missing, &missing);
    assert!(result.is_err());
}

#[test]
fn test_primary_is_registered_under_display_path() {
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("tmp0001.i");
    fs::write(&temp, "x").unwrap();
    let loaded = SourceLoader::new(None, DEFAULT_MAX_INCLUDE_DEPTH)
        .load_file(&temp, Path::new("scripts/door.ssl"))
        .unwrap();
    assert_eq!(
        loaded.sources.path(FileId::PRIMARY),
        Some(Path::new("scripts/door.ssl"))
    );
}
