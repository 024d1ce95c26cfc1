//! Memoised parsing for repeated renders of the same document.
//!
//! [`IncrementalParser`] caches the last text it saw together with its
//! elements. Calling it again with identical text returns the cached list;
//! any difference, even a single character, triggers a full re-scan.
//!
//! The memo is plain owned state behind `&mut self`. Sharing one parser
//! across threads needs external locking.

use crate::{code_blocks, CodeBlock, MarkdownElement, Tokenizer};
use log::{debug, trace};

/// Cache-of-one wrapper around [`Tokenizer`].
#[derive(Debug, Clone, Default)]
pub struct IncrementalParser {
    tokenizer: Tokenizer,
    last_text: String,
    last_elements: Vec<MarkdownElement>,
    scans: usize,
}

impl IncrementalParser {
    /// Create a parser with the default tokenizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser around a configured tokenizer.
    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            ..Self::default()
        }
    }

    /// The tokenizer used for scans.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Return the elements of `text`, scanning only if it differs from the
    /// previous call.
    pub fn parse_if_needed(&mut self, text: &str) -> &[MarkdownElement] {
        if text != self.last_text {
            self.last_elements = self.tokenizer.parse(text);
            self.last_text.clear();
            self.last_text.push_str(text);
            self.scans += 1;
            debug!(
                "Re-scanned document ({} elements, scan #{})",
                self.last_elements.len(),
                self.scans
            );
        } else {
            trace!("Memo hit, {} elements", self.last_elements.len());
        }
        &self.last_elements
    }

    /// Elements of the most recently parsed text.
    pub fn elements(&self) -> &[MarkdownElement] {
        &self.last_elements
    }

    /// Code blocks of the most recently parsed text.
    pub fn code_blocks(&self) -> Vec<CodeBlock> {
        code_blocks(&self.last_elements)
    }

    /// Forget the memo so the next call re-scans.
    pub fn clear_cache(&mut self) {
        self.last_text.clear();
        self.last_elements.clear();
    }

    /// Number of full scans performed so far.
    pub fn scan_count(&self) -> usize {
        self.scans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdplay_core::ElementKind;

    #[test]
    fn test_same_text_scans_once() {
        let mut parser = IncrementalParser::new();
        let first = parser.parse_if_needed("# Title\n*x*").to_vec();
        let second = parser.parse_if_needed("# Title\n*x*").to_vec();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(parser.scan_count(), 1);
    }

    #[test]
    fn test_edit_forces_rescan() {
        let mut parser = IncrementalParser::new();
        parser.parse_if_needed("**a**");
        let elements = parser.parse_if_needed("**ab**");

        assert_eq!(elements[0].content, "ab");
        assert_eq!(parser.scan_count(), 2);
    }

    #[test]
    fn test_empty_text_is_cached_from_start() {
        let mut parser = IncrementalParser::new();
        assert!(parser.parse_if_needed("").is_empty());
        assert_eq!(parser.scan_count(), 0);
    }

    #[test]
    fn test_clear_cache() {
        let mut parser = IncrementalParser::new();
        parser.parse_if_needed("> quote");
        parser.clear_cache();
        assert!(parser.elements().is_empty());

        parser.parse_if_needed("> quote");
        assert_eq!(parser.scan_count(), 2);
        assert_eq!(parser.elements()[0].kind, ElementKind::Quote);
    }

    #[test]
    fn test_with_tokenizer_settings() {
        let mut parser = IncrementalParser::with_tokenizer(Tokenizer::with_settings(false, false));
        assert!(parser.parse_if_needed("[a](b) ==c==").is_empty());
        assert!(!parser.tokenizer().process_links);
    }

    #[test]
    fn test_code_blocks_follow_last_parse() {
        let mut parser = IncrementalParser::new();
        parser.parse_if_needed("```sh\necho hi\n```");
        let blocks = parser.code_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "echo hi");
        assert_eq!(blocks[0].language.as_deref(), Some("sh"));
    }
}
