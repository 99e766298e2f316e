//! Literal values carried by nodes and variables.

use crate::StrId;

/// Value-kind tags as exposed at the host boundary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ValueKind {
    Int = 1,
    Float = 2,
    String = 3,
}

impl ValueKind {
    /// Boundary tag (`V_INT`, `V_FLOAT`, `V_STRING`).
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }
}

/// A literal value.
///
/// Strings are stored as handles into the unit's string space.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i32),
    Float(f32),
    String(StrId),
}

impl Value {
    pub const ZERO: Value = Value::Int(0);

    #[inline]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Integer payload, if this is an `Int`.
    #[inline]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Little-endian 4-byte storage form: the integer, the float bits, or the
    /// string-space offset.
    pub fn to_le_bytes(&self) -> [u8; 4] {
        match self {
            Value::Int(v) => v.to_le_bytes(),
            Value::Float(v) => v.to_le_bytes(),
            Value::String(id) => id.offset().to_le_bytes(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{PoolId, StringPool};

    #[test]
    fn test_kind_tags_match_boundary() {
        assert_eq!(ValueKind::Int.tag(), 1);
        assert_eq!(ValueKind::Float.tag(), 2);
        assert_eq!(ValueKind::String.tag(), 3);
    }

    #[test]
    fn test_storage_bytes() {
        let mut pool = StringPool::new(PoolId::StringSpace);
        pool.try_intern("pad").unwrap();
        let s = pool.try_intern("text").unwrap();

        assert_eq!(Value::Int(-2).to_le_bytes(), [0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Value::Float(1.0).to_le_bytes(), 1.0f32.to_bits().to_le_bytes());
        assert_eq!(Value::String(s).to_le_bytes(), [4, 0, 0, 0]);
    }

    #[test]
    fn test_default_is_int_zero() {
        assert_eq!(Value::default(), Value::Int(0));
        assert_eq!(Value::default().kind(), ValueKind::Int);
    }
}
