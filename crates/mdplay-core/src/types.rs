//! Core types for mdplay

use serde::{Deserialize, Serialize};

/// A location in document text as a (line, column) pair.
///
/// Both fields are 1-based. Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in chars)
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span `[start, end)` of char offsets into a document.
///
/// # Example
///
/// ```
/// use mdplay_core::TextRange;
///
/// let range = TextRange::new(2, 5);
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(2));
/// assert!(!range.contains(5));
/// assert_eq!(range.slice("¡hola mundo"), Some("ola"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// First char offset included in the range
    pub start: usize,
    /// First char offset past the range
    pub end: usize,
}

impl TextRange {
    /// Create a range. An inverted pair is collapsed to an empty range at `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies inside the half-open range.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether two ranges share at least one offset.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Borrow the chars of `text` covered by this range.
    ///
    /// Returns `None` if the range reaches past the end of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()));
        let start = boundaries.nth(self.start)?;
        let end = if self.is_empty() {
            start
        } else {
            boundaries.nth(self.len() - 1)?
        };
        Some(&text[start..end])
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
