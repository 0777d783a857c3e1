//! Styling for rendered markdown.
//!
//! Uses the terminal's ANSI palette so the preview follows its theme.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineStyle, LineKind};

/// Get the style for a given line kind.
pub fn style_for_line_kind(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineKind::CodeBlock => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),
        LineKind::Quote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        LineKind::Rule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),
        LineKind::ListItem | LineKind::Paragraph | LineKind::Empty => Style::default(),
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED);
    }
    if inline.code {
        style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels_are_bold() {
        for level in 1..=6 {
            let style = style_for_line_kind(LineKind::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_inline_merges_over_base() {
        let base = style_for_line_kind(LineKind::Quote);
        let merged = style_for_inline(
            base,
            InlineStyle {
                strong: true,
                ..InlineStyle::default()
            },
        );
        assert!(merged.add_modifier.contains(Modifier::ITALIC));
        assert!(merged.add_modifier.contains(Modifier::BOLD));
    }
}
