//! Namespace layout.
//!
//! Each scope (the globals, and every procedure's parameters and locals) is
//! packed into one little-endian byte region. Variables get consecutive
//! 4-byte slots in declaration order; an array takes one slot per element.
//! A scope without variables has no layout at all, which the query surface
//! reports as size `-1`.

use std::fmt;

use serde::{Deserialize, Serialize};
use ssl_ir::{VarScope, Variable};

/// Width of one slot: an `i32`, an `f32` or a string-space offset.
pub const SLOT_WIDTH: usize = 4;

/// Which namespace a query is about.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Procedure(u32),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "the global scope"),
            Scope::Procedure(idx) => write!(f, "procedure #{idx}"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("{0} declares no variables and has no namespace")]
    Empty(Scope),
    #[error("no procedure with index {0}")]
    UnknownProcedure(u32),
}

/// Packed storage for one scope.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    bytes: Vec<u8>,
}

impl Namespace {
    /// Lay out `vars`; `None` when there are none.
    pub fn layout(vars: &[Variable]) -> Option<Namespace> {
        if vars.is_empty() {
            return None;
        }
        let slots: usize = vars.iter().map(|v| v.slot_count() as usize).sum();
        let mut bytes = Vec::with_capacity(slots * SLOT_WIDTH);

        for var in vars {
            let slot = initial_slot(var);
            for _ in 0..var.slot_count() {
                bytes.extend_from_slice(&slot);
            }
        }
        Some(Namespace { bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn dump(&self) -> &[u8] {
        &self.bytes
    }
}

/// Bytes every slot of `var` starts with. Imports are owned by another
/// script and start zeroed.
fn initial_slot(var: &Variable) -> [u8; SLOT_WIDTH] {
    if var.scope == VarScope::Import || !var.initialized {
        return [0; SLOT_WIDTH];
    }
    var.value.to_le_bytes()
}

#[cfg(test)]
mod tests;
