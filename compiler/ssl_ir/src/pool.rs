//! Append-only string pools.
//!
//! A pool stores every distinct text exactly once as a NUL-terminated byte
//! string and hands out the byte offset of its first character. Offsets are
//! stable for the lifetime of the pool, so the raw buffer can be handed to a
//! runtime verbatim.
//!
//! Handles are tagged with the [`PoolId`] of the pool that produced them.
//! Resolving a handle against a different pool is an error instead of a
//! silent read of unrelated bytes.

use std::fmt;

use rustc_hash::FxHashMap;

/// Identifies one string pool within a compilation session.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolId {
    /// The unit-wide string space (global names and string literals).
    StringSpace,
    /// The private namelist of the procedure with this index.
    Namelist(u32),
    /// Lexer-side token text, never exposed to the host.
    Scratch,
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolId::StringSpace => write!(f, "string space"),
            PoolId::Namelist(proc) => write!(f, "namelist of procedure #{proc}"),
            PoolId::Scratch => write!(f, "token scratch pool"),
        }
    }
}

/// Offset of an interned string, tagged with its owning pool.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrId {
    pool: PoolId,
    offset: u32,
}

impl StrId {
    /// Pool this handle belongs to.
    #[inline]
    pub const fn pool(self) -> PoolId {
        self.pool
    }

    /// Raw byte offset into the owning pool's buffer.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.offset
    }
}

/// Error raised by pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The handle was produced by a different pool.
    #[error("handle from the {found} used with the {expected}")]
    ForeignHandle { expected: PoolId, found: PoolId },
    /// No string starts at this offset.
    #[error("offset {offset} does not start a string in the {pool}")]
    BadOffset { pool: PoolId, offset: u32 },
    /// The text contains the pool terminator.
    #[error("cannot intern text containing a NUL byte")]
    EmbeddedNul,
    /// The pool grew past the addressable range.
    #[error("{pool} exceeded {max} bytes", max = u32::MAX)]
    Overflow { pool: PoolId },
}

/// Deduplicating, append-only string pool.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringPool {
    id: PoolId,
    /// Concatenated NUL-terminated strings in interning order.
    bytes: Vec<u8>,
    /// Start offset of each interned string, ascending.
    offsets: Vec<u32>,
    /// Text of each interned string, parallel to `offsets`.
    strings: Vec<Box<str>>,
    /// Text to offset.
    map: FxHashMap<Box<str>, u32>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new(id: PoolId) -> Self {
        StringPool {
            id,
            bytes: Vec::new(),
            offsets: Vec::new(),
            strings: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    /// Identifier of this pool.
    #[inline]
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Try to intern `text`, returning the existing handle when already present.
    pub fn try_intern(&mut self, text: &str) -> Result<StrId, PoolError> {
        if let Some(&offset) = self.map.get(text) {
            return Ok(self.handle(offset));
        }
        if text.as_bytes().contains(&0) {
            return Err(PoolError::EmbeddedNul);
        }

        let offset =
            u32::try_from(self.bytes.len()).map_err(|_| PoolError::Overflow { pool: self.id })?;
        // The terminator must stay addressable too.
        if u32::try_from(self.bytes.len() + text.len() + 1).is_err() {
            return Err(PoolError::Overflow { pool: self.id });
        }

        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0);
        self.offsets.push(offset);
        self.strings.push(text.into());
        self.map.insert(text.into(), offset);
        Ok(self.handle(offset))
    }

    /// Look up `text` without interning it.
    pub fn find(&self, text: &str) -> Option<StrId> {
        self.map.get(text).map(|&offset| self.handle(offset))
    }

    /// Resolve a handle to its text.
    pub fn resolve(&self, id: StrId) -> Result<&str, PoolError> {
        if id.pool != self.id {
            return Err(PoolError::ForeignHandle {
                expected: self.id,
                found: id.pool,
            });
        }
        self.offsets
            .binary_search(&id.offset)
            .map(|idx| &*self.strings[idx])
            .map_err(|_| PoolError::BadOffset {
                pool: self.id,
                offset: id.offset,
            })
    }

    /// Resolve a handle, yielding `""` for a handle this pool does not own.
    pub fn lookup(&self, id: StrId) -> &str {
        self.resolve(id).unwrap_or_default()
    }

    /// Size of the pool buffer in bytes, terminators included.
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// The raw pool buffer; exactly `size()` bytes.
    #[inline]
    pub fn dump(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of distinct strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over `(handle, text)` in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (StrId, &str)> + '_ {
        self.offsets
            .iter()
            .zip(&self.strings)
            .map(|(&offset, text)| (self.handle(offset), &**text))
    }

    #[inline]
    fn handle(&self, offset: u32) -> StrId {
        StrId {
            pool: self.id,
            offset,
        }
    }
}

#[cfg(test)]
mod tests;
