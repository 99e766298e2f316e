//! Source files and positions.
//!
//! Positions are `(file, line, column)` triples rather than byte spans: a
//! preprocessed script is stitched together from many files, and `#line`
//! markers remap lines, so a byte offset into one buffer would not identify
//! a place the user can open.

use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a file in the [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileId(u32);

impl FileId {
    /// The primary input file is always registered first.
    pub const PRIMARY: FileId = FileId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A 1-based line/column position inside a source file.
///
/// Ordering is file, then line, then column.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePos {
    pub file: FileId,
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    #[inline]
    pub const fn new(file: FileId, line: u32, column: u32) -> Self {
        SourcePos { file, line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Registry of every file that contributed tokens to a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    files: Vec<PathBuf>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path`, returning the existing id if it is already known.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> FileId {
        let path = path.into();
        if let Some(existing) = self.find(&path) {
            return existing;
        }
        // A script that names four billion files has bigger problems.
        let id = FileId(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
        self.files.push(path);
        id
    }

    /// Look up a previously registered path.
    pub fn find(&self, path: &Path) -> Option<FileId> {
        self.files
            .iter()
            .position(|p| p == path)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(FileId)
    }

    /// Path of a registered file.
    pub fn path(&self, id: FileId) -> Option<&Path> {
        self.files.get(id.index()).map(PathBuf::as_path)
    }

    /// Path of a registered file as display text, `<unknown>` for a stale id.
    pub fn display(&self, id: FileId) -> String {
        self.path(id)
            .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &Path)> + '_ {
        (0u32..)
            .zip(&self.files)
            .map(|(idx, path)| (FileId(idx), path.as_path()))
    }
}

#[cfg(test)]
mod tests;
