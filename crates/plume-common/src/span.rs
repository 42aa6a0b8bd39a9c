use std::ops::Range;

use serde::Serialize;

/// Location of a syntax node in its source file, as a half-open byte range.
///
/// Every untyped expression node carries one, and every typed node and type
/// error copies it from the node it was produced for. Spans are opaque to the
/// checker; only diagnostics turn them back into lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span from `start` up to, but not including, `end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// Byte range into the source, clamped to `source_len` and widened to
    /// at least one byte so renderers always have something to underline.
    pub fn to_range(self, source_len: usize) -> Range<usize> {
        let start = (self.start as usize).min(source_len);
        let end = (self.end as usize).min(source_len).max(start);
        if start == end {
            start..(end + 1).min(source_len)
        } else {
            start..end
        }
    }
}

/// Line start offsets of one source file.
///
/// Built once per file when a diagnostic needs line/column positions.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Scan `source` for line breaks.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self { line_starts }
    }

    /// 1-based (line, column) of a byte offset. Columns count bytes.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line_idx] + 1;
        (line_idx as u32 + 1, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_clamped_and_non_empty() {
        assert_eq!(Span::new(2, 4).to_range(10), 2..4);
        assert_eq!(Span::new(2, 40).to_range(10), 2..10);
        assert_eq!(Span::new(3, 3).to_range(10), 3..4);
        assert_eq!(Span::new(10, 10).to_range(10), 10..10);
    }

    #[test]
    fn line_col_across_lines() {
        let idx = LineIndex::new("x + 1\nfoo(y)\n  $");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(5), (1, 6));
        assert_eq!(idx.line_col(6), (2, 1));
        assert_eq!(idx.line_col(15), (3, 3));
        assert_eq!(idx.line_col(16), (3, 4));
    }
}
