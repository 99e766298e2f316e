use super::*;

/// Mimics `((((...1...))))` parsing: one frame per nesting level.
fn nested_parens(depth: u32) -> u32 {
    ensure_sufficient_stack(|| {
        if depth == 0 {
            1
        } else {
            let padding = [0u8; 256];
            nested_parens(depth - 1) + u32::from(padding[0])
        }
    })
}

#[test]
fn test_shallow_nesting() {
    assert_eq!(nested_parens(8), 1);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    assert_eq!(nested_parens(200_000), 1);
}

#[test]
fn test_passes_result_through() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Err("bad".to_string()));
    assert_eq!(result, Err("bad".to_string()));
}
