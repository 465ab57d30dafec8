//! Line and column lookup for spans.

use tl_ir::Span;

/// Byte offsets of every line start, for 1-based line/column lookup.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[0] = 0`; `offsets[n]` is the byte after the n-th newline.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); columns count characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .offsets
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// One-shot (line, column) of a span's start.
pub fn span_line_col(source: &str, span: Span) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, span.start)
}
