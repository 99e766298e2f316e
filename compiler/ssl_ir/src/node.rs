//! Postfix node lists.
//!
//! Procedure bodies, trigger conditions and the top-level `main` sequence are
//! stored as flat lists in postfix order: operands precede their operator and
//! statements are framed by marker nodes. The tree shape is implied by each
//! node's arity, which is what a stack-based code generator consumes.
//!
//! ```text
//! x := x + 1;    =>   GlobalVar(x) Int(1) Add GlobalVar(x) Store
//! if c then f(); =>   <c> If Proc(f) Call(0) Pop EndIf
//! ```

use std::fmt;

use crate::{SourcePos, Value};

/// Operation or operand carried by a [`Node`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // === Operands ===
    /// Literal integer; value is `Int`.
    Int,
    /// Literal float; value is `Float`.
    Float,
    /// Literal string; value is `String` (string-space handle).
    String,
    /// Not yet resolved name; value is `Int(placeholder index)`.
    Ident,
    /// Global/import/export variable; value is `Int(index)`.
    GlobalVar,
    /// Procedure-local variable or parameter; value is `Int(index)`.
    LocalVar,
    /// Procedure; value is `Int(index)`.
    Proc,
    /// Engine built-in; value is `Int(opcode index)`.
    Builtin,
    /// A name that failed to resolve.
    Error,

    // === Operators ===
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Not,
    And,
    Or,
    BwAnd,
    BwOr,
    BwXor,
    BwNot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `array index Index`
    Index,
    /// `Proc(f) ProcAddr`, the `@f` form.
    ProcAddr,
    /// `args.. callee Call`; value is `Int(argc)`.
    Call,

    // === Statements ===
    /// `value target Store`
    Store,
    /// `value index target StoreIndex`
    StoreIndex,
    /// Discard the value of an expression statement.
    Pop,
    /// `cond If then.. [Else else..] EndIf`
    If,
    Else,
    EndIf,
    /// `Loop cond LoopCond body.. [LoopStep step..] EndLoop`
    Loop,
    LoopCond,
    LoopStep,
    EndLoop,
    /// `[value] Return`; value is `Int(1)` when a value precedes it.
    Return,
    Break,
    Continue,
}

impl NodeKind {
    /// Whether this node names a symbol (resolved or not).
    pub const fn is_symbol(self) -> bool {
        matches!(
            self,
            NodeKind::Ident
                | NodeKind::GlobalVar
                | NodeKind::LocalVar
                | NodeKind::Proc
                | NodeKind::Builtin
                | NodeKind::Error
        )
    }
}

/// One postfix element.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub value: Value,
    pub pos: SourcePos,
}

impl Node {
    #[inline]
    pub const fn new(kind: NodeKind, value: Value, pos: SourcePos) -> Self {
        Node { kind, value, pos }
    }

    /// A node with no payload.
    #[inline]
    pub const fn op(kind: NodeKind, pos: SourcePos) -> Self {
        Node {
            kind,
            value: Value::ZERO,
            pos,
        }
    }
}

/// Ordered node sequence in textual order.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeList {
    nodes: Vec<Node>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append every node of `other`.
    pub fn append(&mut self, other: &mut NodeList) {
        self.nodes.append(&mut other.nodes);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    #[inline]
    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Truncate back to `len` nodes, dropping a partially emitted statement.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Split off the nodes from `at` onward, e.g. an already emitted lvalue.
    pub fn split_off(&mut self, at: usize) -> NodeList {
        NodeList {
            nodes: self.nodes.split_off(at.min(self.nodes.len())),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Node kinds only, convenient for shape assertions.
    pub fn kinds(&self) -> Vec<NodeKind> {
        self.nodes.iter().map(|n| n.kind).collect()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.nodes.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            let has_payload = node.kind.is_symbol()
                || matches!(
                    node.kind,
                    NodeKind::Int
                        | NodeKind::Float
                        | NodeKind::String
                        | NodeKind::Call
                        | NodeKind::Return
                );
            if !has_payload {
                write!(f, "{:?}", node.kind)?;
                continue;
            }
            match node.value {
                Value::Int(v) => write!(f, "{:?}({v})", node.kind)?,
                Value::Float(v) => write!(f, "{:?}({v})", node.kind)?,
                Value::String(id) => write!(f, "{:?}(@{})", node.kind, id.offset())?,
            }
        }
        Ok(())
    }
}
