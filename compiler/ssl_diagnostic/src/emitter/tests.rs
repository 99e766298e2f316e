#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::ErrorCode;
use ssl_ir::{FileId, SourceMap, SourcePos};
use std::path::Path;

fn sources() -> SourceMap {
    let mut map = SourceMap::new();
    map.add("scripts/door.ssl");
    map.add("headers/define.h");
    map
}

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E3001)
        .with_message("`y` redeclared on line 2, first declared on line 1")
        .with_label(SourcePos::new(FileId::PRIMARY, 2, 10), "redeclared here")
        .with_secondary_label(SourcePos::new(FileId::PRIMARY, 1, 10), "first declared here")
        .with_note("rename one of the declarations")
}

fn render(diag: &Diagnostic, mode: ColorMode) -> String {
    let map = sources();
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, &map, mode, false);
        emitter.emit(diag);
        emitter.flush();
    }
    String::from_utf8(output).unwrap()
}

#[test]
fn test_terminal_emitter_no_color() {
    let text = render(&sample_diagnostic(), ColorMode::Never);
    assert!(text.starts_with("error[E3001]: `y` redeclared"));
    assert!(text.contains("--> scripts/door.ssl:2:10: redeclared here"));
    assert!(text.contains("scripts/door.ssl:1:10: first declared here"));
    assert!(text.contains("= note: rename one"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn test_terminal_emitter_with_color() {
    let text = render(&sample_diagnostic(), ColorMode::Always);
    assert!(text.contains("\x1b["));
    assert!(text.contains("E3001"));
}

#[test]
fn test_label_in_included_file_shows_its_path() {
    let header = sources().find(Path::new("headers/define.h")).unwrap();
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("undeclared identifier `q`")
        .with_label(SourcePos::new(header, 7, 3), "here");
    let text = render(&diag, ColorMode::Never);
    assert!(text.contains("headers/define.h:7:3"));
}

#[test]
fn test_summary() {
    let map = sources();
    let mut output = Vec::new();
    {
        let mut emitter =
            TerminalEmitter::with_color_mode(&mut output, &map, ColorMode::Never, false);
        emitter.emit_summary(2, 1);
        emitter.emit_summary(0, 0);
    }
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text, "error: aborting due to 2 previous errors; 1 warning emitted\n");
}

#[test]
fn test_color_flag_parsing() {
    assert_eq!(ColorMode::from_flag("always"), Some(ColorMode::Always));
    assert_eq!(ColorMode::from_flag("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::from_flag("sometimes"), None);
    assert!(!ColorMode::Auto.should_use_colors(false));
}
