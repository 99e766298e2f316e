use super::*;
use pretty_assertions::assert_eq;
use ssl_ir::FileId;

fn at(line: u32, column: u32) -> SourcePos {
    SourcePos::new(FileId::PRIMARY, line, column)
}

#[test]
fn test_builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E4001)
        .with_message("import procedure `Baz` has a body")
        .with_label(at(3, 1), "body here")
        .with_secondary_label(at(1, 1), "declared import here")
        .with_note("import procedures are defined in another script");

    assert!(diag.is_error());
    assert_eq!(diag.kind(), DiagnosticKind::ScopeViolation);
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_pos(), Some(at(3, 1)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_pos_defaults_without_labels() {
    let diag = Diagnostic::warning(ErrorCode::W0002).with_message("repeated qualifier");
    assert!(!diag.is_error());
    assert_eq!(diag.pos(), SourcePos::default());
}

#[test]
fn test_primary_pos_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_secondary_label(at(1, 1), "first")
        .with_label(at(2, 5), "second");
    assert_eq!(diag.primary_pos(), Some(at(2, 5)));
}

#[test]
fn test_redeclaration_names_both_lines() {
    let diag = redeclaration(at(2, 10), at(1, 10), "y");
    assert_eq!(diag.code, ErrorCode::E3001);
    assert!(diag.message.contains("line 2"));
    assert!(diag.message.contains("line 1"));
    assert_eq!(diag.labels[1].pos.line, 1);
    assert!(!diag.labels[1].is_primary);
}

#[test]
fn test_display_format() {
    let diag = undeclared_identifier(at(4, 7), "z");
    assert_eq!(
        diag.to_string(),
        "error [E2001]: undeclared identifier `z`\n  --> 4:7: not found in this scope"
    );
}
