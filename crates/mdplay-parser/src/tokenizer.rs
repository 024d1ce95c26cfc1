//! Whole-document markdown tokenizer.
//!
//! Each construct is found by its own left-to-right, non-overlapping scan
//! over the full text. The per-kind results are concatenated in scan order
//! and stable-sorted by start offset, so elements sharing a start keep the
//! order of their kinds below:
//!
//! Header, BoldItalic, Bold, Italic, InlineCode, CodeBlock, Link, ListItem,
//! Quote, Highlighted.
//!
//! Elements of different kinds may overlap (bold inside a heading, bold and
//! italic inside `***x***`); deciding precedence is left to the consumer.

use crate::MarkdownElement;
use log::trace;
use mdplay_core::{ElementKind, OffsetMap, TextRange};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// =============================================================================
// Regex patterns
// =============================================================================

/// Regex for headings: 1-6 hashes, blank, then content on the same line
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^(#{1,6})[ \t]+(\S.*)$").unwrap());

/// Regex for bold italic: ***text***
static BOLD_ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*([^*]+?)\*\*\*").unwrap());

/// Regex for bold: **text**
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+?)\*\*").unwrap());

/// Regex for inline code: `code`
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Regex for fenced code blocks: a ``` line with optional language tag,
/// content, and a closing ``` line
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^```(\w*)[ \t]*\r?\n((?s:.*?))\r?\n```[ \t]*$").unwrap()
});

/// Regex for links: [text](url)
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Regex for list items: -, * or + at line start
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^[-*+][ \t]+(\S.*)$").unwrap());

/// Regex for block quotes: > at line start
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^>[ \t]+(\S.*)$").unwrap());

/// Regex for highlighted spans: ==text==
static HIGHLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==([^=]+)==").unwrap());

// =============================================================================
// Tokenizer
// =============================================================================

/// Markdown tokenizer.
///
/// Stateless: every call to [`Tokenizer::parse`] scans the full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    /// Whether to detect links
    pub process_links: bool,
    /// Whether to detect `==highlighted==` spans
    pub process_highlights: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a new tokenizer with every construct enabled.
    pub fn new() -> Self {
        Self {
            process_links: true,
            process_highlights: true,
        }
    }

    /// Create a tokenizer with specific settings.
    pub fn with_settings(process_links: bool, process_highlights: bool) -> Self {
        Self {
            process_links,
            process_highlights,
        }
    }

    /// Tokenize a whole document.
    ///
    /// Never fails: text that does not form a construct simply yields no
    /// element for it.
    pub fn parse(&self, text: &str) -> Vec<MarkdownElement> {
        if text.is_empty() {
            return Vec::new();
        }

        let map = OffsetMap::new(text);
        let mut elements = Vec::new();

        self.scan_headers(text, &map, &mut elements);
        scan_simple(&BOLD_ITALIC_RE, ElementKind::BoldItalic, text, &map, &mut elements);
        scan_simple(&BOLD_RE, ElementKind::Bold, text, &map, &mut elements);
        self.scan_italic(text, &map, &mut elements);
        scan_simple(&INLINE_CODE_RE, ElementKind::InlineCode, text, &map, &mut elements);
        self.scan_code_blocks(text, &map, &mut elements);
        if self.process_links {
            self.scan_links(text, &map, &mut elements);
        }
        scan_simple(&LIST_ITEM_RE, ElementKind::ListItem, text, &map, &mut elements);
        scan_simple(&QUOTE_RE, ElementKind::Quote, text, &map, &mut elements);
        if self.process_highlights {
            scan_simple(&HIGHLIGHT_RE, ElementKind::Highlighted, text, &map, &mut elements);
        }

        // Stable: equal starts keep scan order
        elements.sort_by_key(|element| element.range.start);

        trace!(
            "Tokenized {} chars into {} elements",
            map.char_len(),
            elements.len()
        );
        elements
    }

    fn scan_headers(&self, text: &str, map: &OffsetMap, out: &mut Vec<MarkdownElement>) {
        for caps in HEADER_RE.captures_iter(text) {
            let level = group(&caps, 1).len() as u8;
            out.push(element(
                ElementKind::Header(level),
                &caps,
                group(&caps, 2),
                map,
            ));
        }
    }

    /// Scan `*text*` not touching another `*` on either side.
    ///
    /// Equivalent to `(?<!\*)\*([^*]+?)\*(?!\*)`, which the regex crate
    /// cannot express. `*` is ASCII, so scanning bytes never splits a char.
    fn scan_italic(&self, text: &str, map: &OffsetMap, out: &mut Vec<MarkdownElement>) {
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'*' || (i > 0 && bytes[i - 1] == b'*') {
                i += 1;
                continue;
            }

            // Content cannot hold a '*', so the only candidate close is the next one
            let Some(gap) = bytes[i + 1..].iter().position(|&b| b == b'*') else {
                break;
            };
            let close = i + 1 + gap;

            if gap > 0 && bytes.get(close + 1) != Some(&b'*') {
                out.push(MarkdownElement::new(
                    ElementKind::Italic,
                    TextRange::new(map.char_offset(i), map.char_offset(close + 1)),
                    &text[i + 1..close],
                ));
                i = close + 1;
            } else {
                i += 1;
            }
        }
    }

    fn scan_code_blocks(&self, text: &str, map: &OffsetMap, out: &mut Vec<MarkdownElement>) {
        for caps in CODE_BLOCK_RE.captures_iter(text) {
            let language = Some(group(&caps, 1))
                .filter(|tag| !tag.is_empty())
                .map(str::to_string);
            out.push(element(
                ElementKind::CodeBlock { language },
                &caps,
                group(&caps, 2),
                map,
            ));
        }
    }

    fn scan_links(&self, text: &str, map: &OffsetMap, out: &mut Vec<MarkdownElement>) {
        for caps in LINK_RE.captures_iter(text) {
            let url = group(&caps, 2).to_string();
            out.push(element(
                ElementKind::Link { url },
                &caps,
                group(&caps, 1),
                map,
            ));
        }
    }
}

/// Scan a pattern whose first group is the element content.
fn scan_simple(
    re: &Regex,
    kind: ElementKind,
    text: &str,
    map: &OffsetMap,
    out: &mut Vec<MarkdownElement>,
) {
    for caps in re.captures_iter(text) {
        out.push(element(kind.clone(), &caps, group(&caps, 1), map));
    }
}

fn element(kind: ElementKind, caps: &Captures<'_>, content: &str, map: &OffsetMap) -> MarkdownElement {
    let (start, end) = caps
        .get(0)
        .map(|m| (m.start(), m.end()))
        .unwrap_or_default();
    MarkdownElement::new(
        kind,
        TextRange::new(map.char_offset(start), map.char_offset(end)),
        content,
    )
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map(|m| m.as_str()).unwrap_or("")
}
