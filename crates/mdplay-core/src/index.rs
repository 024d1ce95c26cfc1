//! Offset conversion tables.
//!
//! Regex engines report byte offsets, editors report (line, column) pairs,
//! and element ranges are expressed in chars. These tables convert between
//! the three after a single O(n) pass over the text.

use crate::types::Position;

/// Maps byte offsets of a text to char offsets.
///
/// ASCII text is common enough that it gets an identity fast path with no
/// allocation.
#[derive(Debug, Clone)]
pub enum OffsetMap {
    /// Every char is one byte, offsets are identical
    Ascii { len: usize },
    /// Byte offset of every char start, followed by the text length
    Utf8 { starts: Vec<usize> },
}

impl OffsetMap {
    /// Build the table for `text`.
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            OffsetMap::Ascii { len: text.len() }
        } else {
            let mut starts: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
            starts.push(text.len());
            OffsetMap::Utf8 { starts }
        }
    }

    /// Char offset of a byte offset.
    ///
    /// A byte offset inside a multi-byte char maps to that char. Offsets past
    /// the end clamp to the char length.
    pub fn char_offset(&self, byte: usize) -> usize {
        match self {
            OffsetMap::Ascii { len } => byte.min(*len),
            OffsetMap::Utf8 { starts } => match starts.binary_search(&byte) {
                Ok(index) => index,
                Err(index) => index.saturating_sub(1),
            },
        }
    }

    /// Total number of chars in the text.
    pub fn char_len(&self) -> usize {
        match self {
            OffsetMap::Ascii { len } => *len,
            OffsetMap::Utf8 { starts } => starts.len() - 1,
        }
    }
}

/// Maps 1-based line numbers to the char offset where each line starts.
///
/// Lines are terminated by `\n`; a preceding `\r` counts as content of the
/// line it ends. The index is a snapshot of one text and must be rebuilt
/// whenever the text changes.
///
/// # Example
///
/// ```
/// use mdplay_core::{LineIndex, Position};
///
/// let index = LineIndex::new("# Title\nbody\n");
/// assert_eq!(index.line_count(), 3);
/// assert_eq!(index.offset(Position::new(2, 1)), Some(8));
/// assert_eq!(index.position(9), Some(Position::new(2, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Char offset of the first char of each line
    line_starts: Vec<usize>,
    /// Total char length of the text
    len: usize,
}

impl LineIndex {
    /// Build the index with one pass over `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;
        for c in text.chars() {
            len += 1;
            if c == '\n' {
                line_starts.push(len);
            }
        }
        Self { line_starts, len }
    }

    /// Number of lines. An empty text and a text ending in `\n` both have a
    /// final empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Total char length of the indexed text.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Char offset where `line` (1-based) starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }

    /// Number of chars on `line`, excluding its `\n` terminator.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let end = match self.line_starts.get(line) {
            Some(next) => next - 1,
            None => self.len,
        };
        Some(end - start)
    }

    /// Convert a position to a char offset in O(1).
    ///
    /// Column `line_len + 1` addresses the end of the line. Anything further
    /// right, and lines or columns of zero, yield `None`.
    pub fn offset(&self, position: Position) -> Option<usize> {
        let start = self.line_start(position.line)?;
        let line_len = self.line_len(position.line)?;
        let column = position.column.checked_sub(1)?;
        if column > line_len {
            return None;
        }
        Some(start + column)
    }

    /// Convert a char offset back to a position in O(log n).
    ///
    /// The offset one past the last char is valid and maps to the end of the
    /// last line.
    pub fn position(&self, offset: usize) -> Option<Position> {
        if offset > self.len {
            return None;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        Some(Position::new(line, offset - start + 1))
    }
}
