use tracing::warn;

use crate::app::Model;
use crate::app::model::ToastLevel;
use crate::document::render_markdown;
use crate::editor::{Direction, EditorBuffer};
use crate::preview::{HostEvent, ViewMode};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Host lifecycle
    /// Panes restored; run startup handling
    LayoutReady,

    // Panes
    /// Activate the next pane
    NextPane,
    /// Activate the previous pane
    PrevPane,
    /// Close the active pane
    ClosePane,
    /// Toggle the active pane between source and preview
    ToggleMode,
    /// Save the active pane to disk
    Save,

    // Source mode
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Split line at cursor (Enter)
    EditorSplitLine,
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    EditorMoveHome,
    /// Move cursor to end of line (End)
    EditorMoveEnd,

    // Preview mode
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Go to beginning of document
    GoToTop,
    /// Go to end of document
    GoToBottom,

    // Open prompt
    /// Show the open-file prompt
    StartOpenPrompt,
    /// Replace the prompt text
    PromptInput(String),
    /// Open the path in the prompt
    SubmitOpenPrompt,
    /// Hide the prompt
    CancelOpenPrompt,

    // Settings panel
    /// Show or hide the settings panel
    ToggleSettings,
    /// Move focus to the next control
    SettingsFocusNext,
    /// Move focus to the previous control
    SettingsFocusPrev,
    /// Type into the focused text field
    SettingsInputChar(char),
    /// Backspace in the focused text field
    SettingsDeleteBack,
    /// Toggle or cycle the focused control
    SettingsActivate,
    /// The settings file changed on disk
    SettingsFileChanged,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Apply a message to the model.
///
/// File I/O (save, open, settings reload) happens in the side-effect
/// handler; everything here is in-memory.
pub fn update(model: &mut Model, msg: Message) {
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }
    if !matches!(msg, Message::ClosePane) {
        model.close_confirmed = false;
    }

    match msg {
        Message::LayoutReady => model.notify(HostEvent::LayoutReady),

        Message::NextPane | Message::PrevPane => {
            let count = model.panes.len();
            if count < 2 {
                return;
            }
            model.active = if msg == Message::NextPane {
                (model.active + 1) % count
            } else {
                (model.active + count - 1) % count
            };
            model.notify(HostEvent::ActiveViewChanged);
        }
        Message::ClosePane => close_active_pane(model),
        Message::ToggleMode => toggle_mode(model),

        Message::EditorInsertChar(ch) => edit_active(model, |buf| buf.insert_char(ch)),
        Message::EditorSplitLine => edit_active(model, EditorBuffer::split_line),
        Message::EditorDeleteBack => edit_active(model, EditorBuffer::delete_back),
        Message::EditorDeleteForward => {
            edit_active(model, EditorBuffer::delete_forward);
        }
        Message::EditorMoveCursor(direction) => {
            move_active(model, |buf| buf.move_cursor(direction));
        }
        Message::EditorMoveHome => move_active(model, EditorBuffer::move_home),
        Message::EditorMoveEnd => move_active(model, EditorBuffer::move_end),

        Message::ScrollUp(n) => {
            if let Some(pane) = model.active_pane_mut() {
                let offset = pane.preview_scroll().saturating_sub(n);
                pane.set_preview_scroll(offset);
            }
        }
        Message::ScrollDown(n) => {
            let max = max_preview_scroll(model);
            if let Some(pane) = model.active_pane_mut() {
                let offset = pane.preview_scroll().saturating_add(n).min(max);
                pane.set_preview_scroll(offset);
            }
        }
        Message::GoToTop => {
            if let Some(pane) = model.active_pane_mut() {
                pane.set_preview_scroll(0);
            }
        }
        Message::GoToBottom => {
            let max = max_preview_scroll(model);
            if let Some(pane) = model.active_pane_mut() {
                pane.set_preview_scroll(max);
            }
        }

        Message::StartOpenPrompt => model.open_prompt = Some(String::new()),
        Message::PromptInput(text) => {
            if model.open_prompt.is_some() {
                model.open_prompt = Some(text);
            }
        }
        Message::CancelOpenPrompt => model.open_prompt = None,
        // Opening reads from disk; see effects.
        Message::SubmitOpenPrompt | Message::Save | Message::SettingsFileChanged => {}

        Message::ToggleSettings => {
            model.panel_visible = !model.panel_visible;
            if model.panel_visible {
                model.panel.sync(model.controller.settings());
            }
        }
        Message::SettingsFocusNext => model.panel.focus_next(),
        Message::SettingsFocusPrev => model.panel.focus_prev(),
        Message::SettingsInputChar(ch) => {
            let result = model.panel.insert_char(ch, &mut model.controller);
            report_settings_write(model, result);
        }
        Message::SettingsDeleteBack => {
            let result = model.panel.delete_back(&mut model.controller);
            report_settings_write(model, result);
        }
        Message::SettingsActivate => {
            let result = model.panel.activate(&mut model.controller);
            report_settings_write(model, result);
        }

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            let rows = model.content_height();
            if let Some(pane) = model.active_pane_mut() {
                pane.follow_cursor(rows);
            }
        }

        Message::Quit => {
            if model.has_unsaved_changes() && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes. Press Ctrl+Q again to quit",
                );
            } else {
                model.should_quit = true;
            }
        }
    }
}

/// Apply a buffer edit to the active source-mode pane; real edits notify the controller.
fn edit_active(model: &mut Model, edit: impl FnOnce(&mut EditorBuffer) -> bool) {
    let rows = model.content_height();
    let Some(pane) = model.active_pane_mut() else {
        return;
    };
    if pane.mode() != ViewMode::Source {
        return;
    }
    let changed = edit(&mut pane.buffer);
    pane.follow_cursor(rows);
    if changed {
        model.notify(HostEvent::EditorChanged);
    }
}

fn move_active(model: &mut Model, movement: impl FnOnce(&mut EditorBuffer)) {
    let rows = model.content_height();
    let Some(pane) = model.active_pane_mut() else {
        return;
    };
    if pane.mode() != ViewMode::Source {
        return;
    }
    movement(&mut pane.buffer);
    pane.follow_cursor(rows);
}

/// Largest preview offset that still fills the viewport.
fn max_preview_scroll(model: &Model) -> usize {
    let Some(pane) = model.active_pane() else {
        return 0;
    };
    let width = crate::ui::preview_content_width(model.terminal_size.0);
    let total = render_markdown(&pane.buffer.text(), width).len();
    total.saturating_sub(model.content_height())
}

fn toggle_mode(model: &mut Model) {
    let Some(pane) = model.active_pane_mut() else {
        return;
    };
    if !pane.is_markdown() {
        model.show_toast(ToastLevel::Info, "Reading mode is only available for markdown");
        return;
    }
    let next = match pane.mode() {
        ViewMode::Source => ViewMode::Preview,
        ViewMode::Preview => ViewMode::Source,
    };
    pane.set_mode(next);
}

fn close_active_pane(model: &mut Model) {
    let Some(pane) = model.active_pane() else {
        return;
    };
    if pane.buffer.is_dirty() && !model.close_confirmed {
        model.close_confirmed = true;
        model.show_toast(
            ToastLevel::Warning,
            "Unsaved changes. Press Ctrl+W again to close",
        );
        return;
    }
    model.panes.remove(model.active);
    model.close_confirmed = false;
    if model.active >= model.panes.len() {
        model.active = model.panes.len().saturating_sub(1);
    }
    if !model.panes.is_empty() {
        model.notify(HostEvent::ActiveViewChanged);
    }
}

fn report_settings_write(model: &mut Model, result: Result<bool, crate::settings::SettingsError>) {
    if let Err(err) = result {
        warn!(%err, "settings save failed");
        model.show_toast(ToastLevel::Error, format!("Settings not saved: {err}"));
    }
}
