//! Byte offset to line/column mapping, with `#line` remapping.

use ssl_ir::{FileId, SourcePos};

/// Start offset of every physical line in one buffer.
pub(crate) struct LineMap<'src> {
    source: &'src str,
    starts: Vec<usize>,
}

impl<'src> LineMap<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        LineMap { source, starts }
    }

    /// 1-based physical line and character column of `offset`.
    pub(crate) fn line_col(&self, offset: usize) -> (u32, u32) {
        let line_idx = match self.starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let start = self.starts[line_idx];
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (saturating_u32(line_idx + 1), saturating_u32(column + 1))
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Where physical lines currently map to.
///
/// After `#line N "f"` on physical line `P`, physical line `P + 1` is line `N`
/// of `f`, and the mapping advances one for one from there.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LineRemap {
    file: FileId,
    physical_base: u32,
    mapped_base: u32,
}

impl LineRemap {
    pub(crate) fn identity(file: FileId) -> Self {
        LineRemap {
            file,
            physical_base: 1,
            mapped_base: 1,
        }
    }

    /// Apply a marker found on `physical_line`.
    pub(crate) fn reset(&mut self, physical_line: u32, mapped_line: u32, file: Option<FileId>) {
        if let Some(file) = file {
            self.file = file;
        }
        self.physical_base = physical_line.saturating_add(1);
        self.mapped_base = mapped_line;
    }

    pub(crate) fn map(&self, physical_line: u32, column: u32) -> SourcePos {
        let line = self
            .mapped_base
            .saturating_add(physical_line.saturating_sub(self.physical_base));
        SourcePos::new(self.file, line, column)
    }
}
