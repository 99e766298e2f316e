#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use ssl_ir::{PoolId, SourcePos, StringPool, Value};

use super::*;

fn var(pool: &mut StringPool, name: &str, scope: VarScope, value: Option<Value>) -> Variable {
    let mut var = Variable::new(pool.try_intern(name).unwrap(), scope, SourcePos::default());
    if let Some(value) = value {
        var.value = value;
        var.initialized = true;
    }
    var
}

#[test]
fn test_empty_scope_has_no_layout() {
    assert_eq!(Namespace::layout(&[]), None);
}

#[test]
fn test_slots_in_declaration_order() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    let greeting = pool.try_intern("hello").unwrap();
    let mut arr = var(&mut pool, "arr", VarScope::Global, Some(Value::Int(7)));
    arr.array_len = 2;
    let vars = [
        var(&mut pool, "n", VarScope::Global, Some(Value::Int(-2))),
        arr,
        var(&mut pool, "f", VarScope::Export, Some(Value::Float(1.5))),
        var(&mut pool, "s", VarScope::Global, Some(Value::String(greeting))),
    ];

    let ns = Namespace::layout(&vars).unwrap();

    assert_eq!(ns.size(), 5 * SLOT_WIDTH);
    let mut expected = Vec::new();
    expected.extend_from_slice(&(-2i32).to_le_bytes());
    expected.extend_from_slice(&7i32.to_le_bytes());
    expected.extend_from_slice(&7i32.to_le_bytes());
    expected.extend_from_slice(&1.5f32.to_bits().to_le_bytes());
    expected.extend_from_slice(&greeting.offset().to_le_bytes());
    assert_eq!(ns.dump(), expected.as_slice());
}

#[test]
fn test_imports_and_uninitialized_are_zero() {
    let mut pool = StringPool::new(PoolId::StringSpace);
    let mut import = var(&mut pool, "shared", VarScope::Import, None);
    import.value = Value::Int(9);
    let vars = [import, var(&mut pool, "later", VarScope::Global, None)];

    let ns = Namespace::layout(&vars).unwrap();
    assert_eq!(ns.dump(), [0u8; 8].as_slice());
}

#[test]
fn test_scope_display() {
    assert_eq!(
        LayoutError::Empty(Scope::Procedure(3)).to_string(),
        "procedure #3 declares no variables and has no namespace"
    );
}
