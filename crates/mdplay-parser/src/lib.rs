//! mdplay Parser
//!
//! The markdown tokenizer behind the live editor. Every edit re-tokenizes the
//! whole document into an ordered list of [`MarkdownElement`]s, which drive
//! styling and locate the fenced code blocks that can be executed.
//!
//! # Overview
//!
//! - [`Tokenizer`] runs one independent scan per construct and merges the
//!   results by start offset.
//! - [`IncrementalParser`] memoises the last document so that re-renders
//!   without an edit (cursor moves, focus changes) skip the scan.
//! - [`CodeBlock`] is the execution-facing view of fenced code elements.
//!
//! # Example
//!
//! ```
//! use mdplay_core::ElementKind;
//! use mdplay_parser::IncrementalParser;
//!
//! let mut parser = IncrementalParser::new();
//! let elements = parser.parse_if_needed("# Hello\n\n**World**");
//!
//! assert_eq!(elements[0].kind, ElementKind::Header(1));
//! assert_eq!(elements[0].content, "Hello");
//! assert_eq!(elements[1].kind, ElementKind::Bold);
//! ```

pub mod incremental;
pub mod tokenizer;

pub use incremental::IncrementalParser;
pub use tokenizer::Tokenizer;

use mdplay_core::{ElementKind, TextRange};

/// A markdown construct found by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownElement {
    /// What was found
    pub kind: ElementKind,
    /// Char range of the whole construct, markers included
    pub range: TextRange,
    /// Inner text without markers
    pub content: String,
}

impl MarkdownElement {
    pub fn new(kind: ElementKind, range: TextRange, content: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            content: content.into(),
        }
    }

    /// Heading level for headers.
    pub fn level(&self) -> Option<u8> {
        self.kind.level()
    }

    /// Link target, for links only.
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Link { url } => Some(url),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarkdownElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {:?}", self.range, self.kind, self.content)?;
        match &self.kind {
            ElementKind::Link { url } => write!(f, " -> {}", url),
            ElementKind::CodeBlock {
                language: Some(language),
            } => write!(f, " [{}]", language),
            _ => Ok(()),
        }
    }
}

/// An executable fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Code between the fences
    pub text: String,
    /// Char range of the block, fences included
    pub range: TextRange,
    /// Language tag of the opening fence
    pub language: Option<String>,
}

impl CodeBlock {
    /// Whether a cursor at `offset` is inside this block.
    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(offset)
    }
}

/// Collect the code blocks among `elements`, in document order.
pub fn code_blocks(elements: &[MarkdownElement]) -> Vec<CodeBlock> {
    elements
        .iter()
        .filter_map(|element| match &element.kind {
            ElementKind::CodeBlock { language } => Some(CodeBlock {
                text: element.content.clone(),
                range: element.range,
                language: language.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Find the first code block enclosing a cursor offset.
pub fn code_block_at(blocks: &[CodeBlock], cursor: usize) -> Option<&CodeBlock> {
    blocks.iter().find(|block| block.contains(cursor))
}
