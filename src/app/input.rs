use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::preview::ViewMode;
use crate::settings_panel::PanelControl;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                debug!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if let Some(text) = &model.open_prompt {
            return prompt_key(key, text);
        }

        // Global bindings
        match key.code {
            KeyCode::Char('q') if ctrl => return Some(Message::Quit),
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::F(2) => return Some(Message::ToggleSettings),
            _ => {}
        }

        if model.panel_visible {
            return panel_key(key, model);
        }

        match key.code {
            KeyCode::Char('e') if ctrl => return Some(Message::ToggleMode),
            KeyCode::Char('s') if ctrl => return Some(Message::Save),
            KeyCode::Char('o') if ctrl => return Some(Message::StartOpenPrompt),
            KeyCode::Char('w') if ctrl => return Some(Message::ClosePane),
            KeyCode::Tab => return Some(Message::NextPane),
            KeyCode::BackTab => return Some(Message::PrevPane),
            _ => {}
        }
        if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match model.active_pane().map(crate::app::Pane::mode) {
            Some(ViewMode::Source) => source_key(key),
            Some(ViewMode::Preview) => preview_key(key, model),
            None => None,
        }
    }
}

fn prompt_key(key: KeyEvent, text: &str) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::CancelOpenPrompt),
        KeyCode::Enter => Some(Message::SubmitOpenPrompt),
        KeyCode::Backspace => {
            let mut next = text.to_string();
            next.pop();
            Some(Message::PromptInput(next))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut next = text.to_string();
            next.push(c);
            Some(Message::PromptInput(next))
        }
        _ => None,
    }
}

fn panel_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::ToggleSettings),
        KeyCode::Down | KeyCode::Tab => Some(Message::SettingsFocusNext),
        KeyCode::Up | KeyCode::BackTab => Some(Message::SettingsFocusPrev),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::SettingsActivate),
        KeyCode::Left | KeyCode::Right if model.panel.focus() != PanelControl::Timeout => {
            Some(Message::SettingsActivate)
        }
        KeyCode::Backspace if model.panel.focus() == PanelControl::Timeout => {
            Some(Message::SettingsDeleteBack)
        }
        KeyCode::Char(c) if model.panel.focus() == PanelControl::Timeout => {
            Some(Message::SettingsInputChar(c))
        }
        _ => None,
    }
}

const fn source_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char(c) => Some(Message::EditorInsertChar(c)),
        KeyCode::Enter => Some(Message::EditorSplitLine),
        KeyCode::Backspace => Some(Message::EditorDeleteBack),
        KeyCode::Delete => Some(Message::EditorDeleteForward),
        KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
        KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
        KeyCode::Home => Some(Message::EditorMoveHome),
        KeyCode::End => Some(Message::EditorMoveEnd),
        _ => None,
    }
}

fn preview_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let page = model.content_height().max(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
        KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::ScrollDown(page)),
        KeyCode::Char('b') | KeyCode::PageUp => Some(Message::ScrollUp(page)),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
        _ => None,
    }
}
