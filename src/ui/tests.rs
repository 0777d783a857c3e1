use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::*;
use crate::app::{Message, Model, Pane, ToastLevel, update};
use crate::preview::IdlePreviewController;
use crate::settings::{MemoryStore, Settings, SettingsStore};

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn create_test_model(text: &str) -> Model {
    let controller = IdlePreviewController::with_settings(
        Box::new(MemoryStore::new()) as Box<dyn SettingsStore>,
        Settings::default(),
    );
    Model::new(
        vec![Pane::new(PathBuf::from("notes.md"), text)],
        controller,
        (80, 24),
    )
}

fn draw_rows(model: &Model) -> Vec<String> {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let symbols: Vec<String> = buffer
        .content()
        .iter()
        .map(|c| c.symbol().to_string())
        .collect();
    symbols.chunks(width).map(|row| row.concat()).collect()
}

fn screen_contains(rows: &[String], needle: &str) -> bool {
    rows.iter().any(|row| row.contains(needle))
}

#[test]
fn test_source_mode_shows_gutter_and_text() {
    let model = create_test_model("# Title\n\nbody text");
    let rows = draw_rows(&model);
    assert!(rows[1].starts_with("1 # Title"), "row was {:?}", rows[1]);
    assert!(screen_contains(&rows, "3 body text"));
    assert!(rows[23].contains("EDIT"));
    assert!(rows[23].contains("Ln 1, Col 1"));
}

#[test]
fn test_preview_mode_renders_markdown() {
    let mut model = create_test_model("# Title\n\nSome **bold** words");
    update(&mut model, Message::ToggleMode);
    let rows = draw_rows(&model);
    assert!(rows[1].starts_with("  # Title"), "row was {:?}", rows[1]);
    assert!(!screen_contains(&rows, "**bold**"));
    assert!(screen_contains(&rows, "Some bold words"));
    assert!(rows[23].contains("READ"));
}

#[test]
fn test_tab_bar_lists_panes_with_dirty_marker() {
    let mut model = create_test_model("x");
    model.panes.push(Pane::new(PathBuf::from("other.txt"), "y"));
    update(&mut model, Message::EditorInsertChar('!'));
    let rows = draw_rows(&model);
    assert!(rows[0].contains("notes.md *"));
    assert!(rows[0].contains("other.txt"));
}

#[test]
fn test_status_bar_shows_countdown_after_edit() {
    let mut model = create_test_model("x");
    model.now_ms = 0;
    update(&mut model, Message::EditorInsertChar('a'));
    let rows = draw_rows(&model);
    assert!(rows[23].contains("reading in 5:00"), "status was {:?}", rows[23]);
}

#[test]
fn test_settings_overlay_lists_controls() {
    let mut model = create_test_model("x");
    update(&mut model, Message::ToggleSettings);
    let rows = draw_rows(&model);
    assert!(screen_contains(&rows, "Settings"));
    assert!(screen_contains(&rows, "Timeout (minutes)"));
    assert!(screen_contains(&rows, "[5]"));
    assert!(screen_contains(&rows, "Startup in Reading mode"));
    assert!(screen_contains(&rows, "< on >"));
    assert!(screen_contains(&rows, "when the first document opens"));
}

#[test]
fn test_toast_is_drawn_above_status() {
    let mut model = create_test_model("x");
    model.show_toast(ToastLevel::Warning, "careful");
    let rows = draw_rows(&model);
    assert!(rows[22].contains("[warn] careful"));
}

#[test]
fn test_open_prompt_replaces_toast() {
    let mut model = create_test_model("x");
    model.show_toast(ToastLevel::Info, "hidden");
    update(&mut model, Message::StartOpenPrompt);
    update(&mut model, Message::PromptInput("doc.md".to_string()));
    let rows = draw_rows(&model);
    assert!(rows[22].contains("Open: doc.md"));
    assert!(!screen_contains(&rows, "hidden"));
}

#[test]
fn test_empty_workspace_shows_hint() {
    let controller = IdlePreviewController::with_settings(
        Box::new(MemoryStore::new()) as Box<dyn SettingsStore>,
        Settings::default(),
    );
    let model = Model::new(Vec::new(), controller, (80, 24));
    let rows = draw_rows(&model);
    assert!(screen_contains(&rows, "No documents open"));
}

#[test]
fn test_format_remaining_rounds_up_to_seconds() {
    assert_eq!(format_remaining(300_000), "5:00");
    assert_eq!(format_remaining(61_000), "1:01");
    assert_eq!(format_remaining(1), "0:01");
    assert_eq!(format_remaining(0), "0:00");
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(12_345), 5);
}

#[test]
fn test_preview_content_width_never_zero() {
    assert_eq!(preview_content_width(80), 76);
    assert_eq!(preview_content_width(2), 1);
}
