use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;
use crate::settings_panel::PanelControl;

pub fn settings_popup_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(16).clamp(40, 72);
    let popup_height = 18.min(area.height.saturating_sub(2).max(10));
    centered_popup_rect(popup_width, popup_height, area)
}

pub fn render_settings_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = settings_popup_rect(area);

    let name_style = Style::default().add_modifier(Modifier::BOLD);
    let focus_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();
    for row in model.panel.rows(model.controller.settings()) {
        let marker = if row.focused { "> " } else { "  " };
        let value = if row.control == PanelControl::Timeout {
            format!("[{}]", row.value)
        } else {
            format!("< {} >", row.value)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, focus_style),
            Span::styled(row.name, if row.focused { focus_style } else { name_style }),
            Span::raw("  "),
            Span::styled(value, Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(row.description, dim_style),
        ]));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "Up/Down move \u{2502} Space toggles \u{2502} Esc closes",
        dim_style,
    ));

    let block = Block::default()
        .title("Settings")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
