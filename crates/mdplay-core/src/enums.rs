//! Markdown element kinds.
//!
//! [`ElementKind`] is the closed set of constructs the tokenizer detects.
//! Styling and execution code match on it exhaustively, so adding a
//! construct is a compile-checked change.

use serde::{Deserialize, Serialize};

/// The kind of a detected markdown element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// ATX heading (`#` .. `######`), carrying its level 1..=6
    Header(u8),
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
    /// `***text***`
    BoldItalic,
    /// `` `code` ``
    InlineCode,
    /// Fenced code block delimited by ``` lines
    CodeBlock {
        /// Language tag after the opening fence, if any
        language: Option<String>,
    },
    /// `[text](url)`
    Link {
        /// Link target
        url: String,
    },
    /// `- item`, `* item`, `+ item`
    ListItem,
    /// `> quoted`
    Quote,
    /// `==highlighted==`
    Highlighted,
}

impl ElementKind {
    /// Heading level for headers, `None` for every other kind.
    pub fn level(&self) -> Option<u8> {
        match self {
            ElementKind::Header(level) => Some(*level),
            _ => None,
        }
    }

    /// Whether the construct is line-anchored (spans a whole line).
    pub fn is_line(&self) -> bool {
        matches!(
            self,
            ElementKind::Header(_) | ElementKind::ListItem | ElementKind::Quote
        )
    }

    /// Whether the construct is an inline span within a line.
    pub fn is_inline(&self) -> bool {
        match self {
            ElementKind::Bold
            | ElementKind::Italic
            | ElementKind::BoldItalic
            | ElementKind::InlineCode
            | ElementKind::Link { .. }
            | ElementKind::Highlighted => true,
            ElementKind::Header(_)
            | ElementKind::CodeBlock { .. }
            | ElementKind::ListItem
            | ElementKind::Quote => false,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Header(level) => write!(f, "header{}", level),
            ElementKind::Bold => write!(f, "bold"),
            ElementKind::Italic => write!(f, "italic"),
            ElementKind::BoldItalic => write!(f, "bold_italic"),
            ElementKind::InlineCode => write!(f, "inline_code"),
            ElementKind::CodeBlock { .. } => write!(f, "code_block"),
            ElementKind::Link { .. } => write!(f, "link"),
            ElementKind::ListItem => write!(f, "list_item"),
            ElementKind::Quote => write!(f, "quote"),
            ElementKind::Highlighted => write!(f, "highlighted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ElementKind::Header(3).to_string(), "header3");
        assert_eq!(ElementKind::Bold.to_string(), "bold");
        assert_eq!(ElementKind::BoldItalic.to_string(), "bold_italic");
        assert_eq!(ElementKind::InlineCode.to_string(), "inline_code");
        assert_eq!(
            ElementKind::CodeBlock { language: None }.to_string(),
            "code_block"
        );
        assert_eq!(
            ElementKind::Link {
                url: "https://example.com".to_string()
            }
            .to_string(),
            "link"
        );
        assert_eq!(ElementKind::Highlighted.to_string(), "highlighted");
    }

    #[test]
    fn test_level() {
        assert_eq!(ElementKind::Header(2).level(), Some(2));
        assert_eq!(ElementKind::Quote.level(), None);
    }

    #[test]
    fn test_line_and_inline_are_disjoint() {
        let kinds = [
            ElementKind::Header(1),
            ElementKind::Bold,
            ElementKind::Italic,
            ElementKind::BoldItalic,
            ElementKind::InlineCode,
            ElementKind::CodeBlock { language: None },
            ElementKind::Link { url: String::new() },
            ElementKind::ListItem,
            ElementKind::Quote,
            ElementKind::Highlighted,
        ];
        for kind in &kinds {
            assert!(!(kind.is_line() && kind.is_inline()), "{}", kind);
        }
        assert!(!ElementKind::CodeBlock { language: None }.is_line());
        assert!(!ElementKind::CodeBlock { language: None }.is_inline());
    }
}
