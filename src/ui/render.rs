use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::{Model, Pane};
use crate::document::render_markdown;
use crate::preview::ViewMode;

use super::style::{style_for_inline, style_for_line_kind};
use super::{PREVIEW_LEFT_PADDING, overlays, status};

/// Width available to wrapped preview text.
pub fn preview_content_width(total_width: u16) -> usize {
    total_width.saturating_sub(PREVIEW_LEFT_PADDING * 2).max(1) as usize
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let (tabs_area, body_area, status_area) = (chunks[0], chunks[1], chunks[2]);

    render_tab_bar(model, frame, tabs_area);
    match model.active_pane() {
        Some(pane) if pane.mode() == ViewMode::Preview => render_preview(pane, frame, body_area),
        Some(pane) => render_source(pane, frame, body_area),
        None => render_empty(frame, body_area),
    }
    status::render_status_bar(model, frame, status_area);

    let footer_area = Rect {
        y: body_area.y + body_area.height.saturating_sub(1),
        height: body_area.height.min(1),
        ..body_area
    };
    if model.open_prompt.is_some() {
        status::render_prompt_bar(model, frame, footer_area);
    } else if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, footer_area);
    }

    if model.panel_visible {
        overlays::render_settings_overlay(model, frame, area);
    }
}

fn render_tab_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (idx, pane) in model.panes.iter().enumerate() {
        let style = if idx == model.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", pane.title()), style));
        spans.push(Span::raw(" "));
    }
    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(bar, area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(
            "  No documents open. Ctrl+O to open a file, Ctrl+Q to quit.",
            Style::default().fg(Color::Indexed(245)),
        ),
    ]);
    frame.render_widget(hint, area);
}

fn render_source(pane: &Pane, frame: &mut Frame, area: Rect) {
    let buf = &pane.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);

    let visible_height = area.height as usize;
    let start = pane.editor_scroll;
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);

        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if line_idx == cursor.line {
            // Split line at cursor position for cursor rendering
            let chars: Vec<char> = line_text.chars().collect();
            let col = cursor.col.min(chars.len());
            let before: String = chars[..col].iter().collect();
            let cursor_char = chars.get(col).map_or_else(|| " ".to_string(), char::to_string);
            let after: String = chars.get(col + 1..).map_or_else(String::new, |rest| {
                rest.iter().collect()
            });

            if !before.is_empty() {
                spans.push(Span::raw(before));
            }
            spans.push(Span::styled(
                cursor_char,
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after));
            }
        } else {
            spans.push(Span::raw(line_text));
        }

        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

fn render_preview(pane: &Pane, frame: &mut Frame, area: Rect) {
    let width = preview_content_width(area.width);
    let rendered = render_markdown(&pane.buffer.text(), width);
    let max_offset = rendered.len().saturating_sub(area.height as usize);
    let offset = pane.preview_scroll().min(max_offset);
    let padding = " ".repeat(PREVIEW_LEFT_PADDING as usize);

    let lines: Vec<Line> = rendered
        .iter()
        .skip(offset)
        .take(area.height as usize)
        .map(|line| {
            let base = style_for_line_kind(line.kind);
            let mut spans = vec![Span::raw(padding.clone())];
            spans.extend(
                line.spans
                    .iter()
                    .map(|span| Span::styled(span.text.clone(), style_for_inline(base, span.style))),
            );
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
