use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::preview::ViewMode;

/// Countdown text for the status bar, e.g. `4:59`.
pub fn format_remaining(ms: u64) -> String {
    let secs = ms.div_ceil(1_000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(pane) = model.active_pane() else {
        let bar = Paragraph::new(" autoread  Ctrl+O:open  F2:settings  Ctrl+Q:quit")
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(bar, area);
        return;
    };

    let filename = pane.path.file_name().map_or_else(
        || "untitled".to_string(),
        |s| s.to_string_lossy().to_string(),
    );
    let dirty_indicator = if pane.buffer.is_dirty() {
        " [modified]"
    } else {
        ""
    };

    let (mode_label, mode_style) = match pane.mode() {
        ViewMode::Source => (
            " EDIT ",
            Style::default().bg(Color::Magenta).fg(Color::White),
        ),
        ViewMode::Preview => (
            " READ ",
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
    };

    let position = match pane.mode() {
        ViewMode::Source => {
            let c = pane.buffer.cursor();
            format!("  Ln {}, Col {}", c.line + 1, c.col + 1)
        }
        ViewMode::Preview => format!("  Line {}", pane.preview_scroll() + 1),
    };

    let countdown = model
        .controller
        .next_deadline_in(model.now_ms)
        .map_or_else(String::new, |ms| {
            format!("  [reading in {}]", format_remaining(ms))
        });

    let status = format!(
        " {filename}{dirty_indicator}{position}{countdown}  Ctrl+E:toggle  F2:settings"
    );

    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let line = Line::from(vec![
        Span::styled(mode_label, mode_style.add_modifier(Modifier::BOLD)),
        Span::styled(status, bar_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(bar_style), area);
}

pub fn render_prompt_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let text = model.open_prompt.as_deref().unwrap_or_default();
    let bar = Paragraph::new(format!("Open: {text}  Enter: open  Esc: cancel"))
        .style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
