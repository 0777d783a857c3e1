//! Markdown rendering for panes in preview mode.
//!
//! This module handles:
//! - Parsing markdown with comrak
//! - Flattening the AST into styled, width-wrapped lines

mod parser;

pub use parser::render_markdown;

/// Inline text styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// What a rendered line represents, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Paragraph,
    ListItem,
    Quote,
    CodeBlock,
    Rule,
    Empty,
}

/// One display line of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub fn plain(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            kind,
            spans: vec![InlineSpan::new(text, InlineStyle::default())],
        }
    }

    pub const fn empty() -> Self {
        Self {
            kind: LineKind::Empty,
            spans: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Returns true for paths the host should open as markdown views.
pub fn is_markdown_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown" | "mdown"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_markdown_extensions() {
        assert!(is_markdown_path(Path::new("README.md")));
        assert!(is_markdown_path(Path::new("notes/Today.MARKDOWN")));
        assert!(!is_markdown_path(Path::new("main.rs")));
        assert!(!is_markdown_path(Path::new("Makefile")));
    }

    #[test]
    fn test_rendered_line_text_joins_spans() {
        let line = RenderedLine {
            kind: LineKind::Paragraph,
            spans: vec![
                InlineSpan::new("a ", InlineStyle::default()),
                InlineSpan::new(
                    "b",
                    InlineStyle {
                        strong: true,
                        ..InlineStyle::default()
                    },
                ),
            ],
        };
        assert_eq!(line.text(), "a b");
        assert_eq!(RenderedLine::empty().text(), "");
    }
}
