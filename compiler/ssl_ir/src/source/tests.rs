use super::*;
use std::path::Path;

#[test]
fn test_primary_is_first() {
    let mut map = SourceMap::new();
    let id = map.add("scripts/test.ssl");
    assert_eq!(id, FileId::PRIMARY);
    assert_eq!(map.path(id), Some(Path::new("scripts/test.ssl")));
}

#[test]
fn test_add_is_idempotent() {
    let mut map = SourceMap::new();
    let a = map.add("a.h");
    let b = map.add("b.h");
    let a2 = map.add("a.h");

    assert_eq!(a, a2);
    assert_ne!(a, b);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_stale_id_displays_unknown() {
    let map = SourceMap::new();
    assert_eq!(map.display(FileId::PRIMARY), "<unknown>");
}

#[test]
fn test_position_ordering() {
    let mut map = SourceMap::new();
    let first = map.add("first.ssl");
    let second = map.add("second.h");

    let early = SourcePos::new(first, 10, 1);
    let late = SourcePos::new(first, 10, 7);
    let other = SourcePos::new(second, 1, 1);

    assert!(early < late);
    assert!(late < other);
}
