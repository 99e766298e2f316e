//! Constant evaluation of postfix expressions.
//!
//! Global initializers, parameter defaults and trigger times must be
//! constant. They are parsed like any expression and then evaluated here;
//! anything that is not a literal combined with arithmetic is not constant.

use ssl_ir::{NodeKind, NodeList, Value};

/// Evaluate `nodes` if it is a constant expression.
pub fn fold_constant(nodes: &NodeList) -> Option<Value> {
    let mut stack: Vec<Value> = Vec::with_capacity(4);
    for node in nodes {
        let value = match node.kind {
            NodeKind::Int | NodeKind::Float | NodeKind::String => node.value,
            NodeKind::Neg | NodeKind::Not | NodeKind::BwNot => unary(node.kind, stack.pop()?)?,
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Mod
            | NodeKind::BwAnd
            | NodeKind::BwOr
            | NodeKind::BwXor => {
                let rhs = stack.pop()?;
                let lhs = stack.pop()?;
                binary(node.kind, lhs, rhs)?
            }
            _ => return None,
        };
        stack.push(value);
    }
    match stack.as_slice() {
        [value] => Some(*value),
        _ => None,
    }
}

fn unary(op: NodeKind, operand: Value) -> Option<Value> {
    Some(match (op, operand) {
        (NodeKind::Neg, Value::Int(v)) => Value::Int(v.wrapping_neg()),
        (NodeKind::Neg, Value::Float(v)) => Value::Float(-v),
        (NodeKind::Not, Value::Int(v)) => Value::Int(i32::from(v == 0)),
        (NodeKind::BwNot, Value::Int(v)) => Value::Int(!v),
        _ => return None,
    })
}

#[allow(clippy::cast_precision_loss, reason = "mixed arithmetic promotes to f32 like the engine")]
fn binary(op: NodeKind, lhs: Value, rhs: Value) -> Option<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(Value::Int(match op {
            NodeKind::Add => a.wrapping_add(b),
            NodeKind::Sub => a.wrapping_sub(b),
            NodeKind::Mul => a.wrapping_mul(b),
            NodeKind::Div => a.checked_div(b)?,
            NodeKind::Mod => a.checked_rem(b)?,
            NodeKind::BwAnd => a & b,
            NodeKind::BwOr => a | b,
            NodeKind::BwXor => a ^ b,
            _ => return None,
        })),
        (Value::Int(a), Value::Float(b)) => float_op(op, a as f32, b),
        (Value::Float(a), Value::Int(b)) => float_op(op, a, b as f32),
        (Value::Float(a), Value::Float(b)) => float_op(op, a, b),
        _ => None,
    }
}

fn float_op(op: NodeKind, a: f32, b: f32) -> Option<Value> {
    let v = match op {
        NodeKind::Add => a + b,
        NodeKind::Sub => a - b,
        NodeKind::Mul => a * b,
        NodeKind::Div if b != 0.0 => a / b,
        _ => return None,
    };
    Some(Value::Float(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssl_ir::{Node, SourcePos};

    fn int(v: i32) -> Node {
        Node::new(NodeKind::Int, Value::Int(v), SourcePos::default())
    }

    fn op(kind: NodeKind) -> Node {
        Node::op(kind, SourcePos::default())
    }

    #[test]
    fn test_folds_arithmetic() {
        let nodes: NodeList = [int(60), int(10), op(NodeKind::Mul), op(NodeKind::Neg)]
            .into_iter()
            .collect();
        assert_eq!(fold_constant(&nodes), Some(Value::Int(-600)));
    }

    #[test]
    fn test_division_by_zero_is_not_constant() {
        let nodes: NodeList = [int(1), int(0), op(NodeKind::Div)].into_iter().collect();
        assert_eq!(fold_constant(&nodes), None);
    }

    #[test]
    fn test_mixed_arithmetic_promotes() {
        let half = Node::new(NodeKind::Float, Value::Float(0.5), SourcePos::default());
        let nodes: NodeList = [int(2), half, op(NodeKind::Add)].into_iter().collect();
        assert_eq!(fold_constant(&nodes), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_symbols_are_not_constant() {
        let var = Node::new(NodeKind::Ident, Value::Int(0), SourcePos::default());
        let nodes: NodeList = [var, int(1), op(NodeKind::Add)].into_iter().collect();
        assert_eq!(fold_constant(&nodes), None);
        assert_eq!(fold_constant(&NodeList::new()), None);
    }
}
