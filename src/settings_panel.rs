//! Settings panel: controls bound to the controller's settings.
//!
//! Every change handler writes through to the store immediately. The only
//! validation is on the timeout field, where text without a leading
//! non-negative integer is ignored and nothing is saved.

use crate::preview::IdlePreviewController;
use crate::settings::{Settings, SettingsError, SettingsStore};

pub const TIMEOUT_NAME: &str = "Timeout (minutes)";
pub const TIMEOUT_DESC: &str =
    "Timeout before Reading mode is enabled while the editor is active or idle.";
pub const STARTUP_NAME: &str = "Startup in Reading mode";
pub const STARTUP_DESC: &str = "View previously opened documents in Reading mode on startup.";
pub const POLICY_NAME: &str = "Startup timing";
pub const POLICY_DESC: &str = "When the one-time startup switch to Reading mode happens.";

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelControl {
    #[default]
    Timeout,
    PreviewOnStartup,
    StartupPolicy,
}

impl PanelControl {
    const ORDER: [Self; 3] = [Self::Timeout, Self::PreviewOnStartup, Self::StartupPolicy];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|c| *c == self).unwrap_or(0);
        let next = if forward { idx + 1 } else { idx + len - 1 };
        Self::ORDER[next % len]
    }
}

/// A control as the UI should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRow {
    pub control: PanelControl,
    pub name: &'static str,
    pub description: &'static str,
    pub value: String,
    pub focused: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    focus: PanelControl,
    timeout_text: String,
}

impl SettingsPanel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            focus: PanelControl::Timeout,
            timeout_text: settings.timeout_minutes.to_string(),
        }
    }

    pub const fn focus(&self) -> PanelControl {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.step(true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.step(false);
    }

    /// Current text of the timeout field (may be unparseable mid-edit).
    pub fn timeout_text(&self) -> &str {
        &self.timeout_text
    }

    /// Reset field text from settings, e.g. after an external reload.
    pub fn sync(&mut self, settings: &Settings) {
        self.timeout_text = settings.timeout_minutes.to_string();
    }

    /// Timeout field change handler.
    ///
    /// Returns whether a new timeout was saved.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_timeout_text<S: SettingsStore>(
        &mut self,
        text: impl Into<String>,
        controller: &mut IdlePreviewController<S>,
    ) -> Result<bool, SettingsError> {
        self.timeout_text = text.into();
        let Some(minutes) = parse_timeout(&self.timeout_text) else {
            return Ok(false);
        };
        if controller.settings().timeout_minutes == minutes
            && controller.persisted().timeout_minutes == minutes
        {
            return Ok(false);
        }
        controller.set_timeout_minutes(minutes)?;
        Ok(true)
    }

    /// Type a character into the focused text field.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn insert_char<S: SettingsStore>(
        &mut self,
        ch: char,
        controller: &mut IdlePreviewController<S>,
    ) -> Result<bool, SettingsError> {
        if self.focus != PanelControl::Timeout {
            return Ok(false);
        }
        let mut text = self.timeout_text.clone();
        text.push(ch);
        self.set_timeout_text(text, controller)
    }

    /// Backspace in the focused text field.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn delete_back<S: SettingsStore>(
        &mut self,
        controller: &mut IdlePreviewController<S>,
    ) -> Result<bool, SettingsError> {
        if self.focus != PanelControl::Timeout {
            return Ok(false);
        }
        let mut text = self.timeout_text.clone();
        text.pop();
        self.set_timeout_text(text, controller)
    }

    /// Toggle or cycle the focused control.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn activate<S: SettingsStore>(
        &mut self,
        controller: &mut IdlePreviewController<S>,
    ) -> Result<bool, SettingsError> {
        match self.focus {
            PanelControl::Timeout => Ok(false),
            PanelControl::PreviewOnStartup => {
                Self::toggle_preview_on_startup(controller)?;
                Ok(true)
            }
            PanelControl::StartupPolicy => {
                Self::cycle_startup_policy(controller)?;
                Ok(true)
            }
        }
    }

    /// Startup toggle change handler.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn toggle_preview_on_startup<S: SettingsStore>(
        controller: &mut IdlePreviewController<S>,
    ) -> Result<(), SettingsError> {
        let enabled = !controller.settings().preview_on_startup;
        controller.set_preview_on_startup(enabled)
    }

    /// Startup timing selector change handler.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn cycle_startup_policy<S: SettingsStore>(
        controller: &mut IdlePreviewController<S>,
    ) -> Result<(), SettingsError> {
        let policy = controller.settings().startup_policy.next();
        controller.set_startup_policy(policy)
    }

    pub fn rows(&self, settings: &Settings) -> Vec<ControlRow> {
        let row = |control: PanelControl,
                   name: &'static str,
                   description: &'static str,
                   value: String| ControlRow {
            control,
            name,
            description,
            value,
            focused: self.focus == control,
        };
        vec![
            row(
                PanelControl::Timeout,
                TIMEOUT_NAME,
                TIMEOUT_DESC,
                self.timeout_text.clone(),
            ),
            row(
                PanelControl::PreviewOnStartup,
                STARTUP_NAME,
                STARTUP_DESC,
                if settings.preview_on_startup { "on" } else { "off" }.to_string(),
            ),
            row(
                PanelControl::StartupPolicy,
                POLICY_NAME,
                POLICY_DESC,
                settings.startup_policy.label().to_string(),
            ),
        ]
    }
}

/// Parse the leading integer of `text`: leading whitespace, an optional
/// sign, then digits. Anything after the digits is ignored.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// A timeout in minutes, or `None` if the text is not a usable value.
pub fn parse_timeout(text: &str) -> Option<u32> {
    parse_leading_int(text).and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryStore, StartupPolicy};
    use serde_json::json;

    fn controller() -> IdlePreviewController<MemoryStore> {
        IdlePreviewController::initialize(MemoryStore::with_blob(json!({ "timeout": 5 }))).unwrap()
    }

    #[test]
    fn test_parse_leading_int_variants() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  7"), Some(7));
        assert_eq!(parse_leading_int("12min"), Some(12));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("1.5"), Some(1));
    }

    #[test]
    fn test_parse_timeout_rejects_negative_and_huge() {
        assert_eq!(parse_timeout("-1"), None);
        assert_eq!(parse_timeout("99999999999"), None);
        assert_eq!(parse_timeout("0"), Some(0));
    }

    #[test]
    fn test_non_numeric_text_is_ignored_without_saving() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());

        let saved = panel.set_timeout_text("soon", &mut controller).unwrap();

        assert!(!saved);
        assert_eq!(controller.settings().timeout_minutes, 5);
        assert_eq!(controller.store().save_count(), 0);
        assert_eq!(panel.timeout_text(), "soon");
    }

    #[test]
    fn test_numeric_text_writes_through() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());

        assert!(panel.set_timeout_text("15", &mut controller).unwrap());

        assert_eq!(controller.settings().timeout_minutes, 15);
        assert_eq!(controller.store().save_count(), 1);
        assert_eq!(
            controller.store().blob().and_then(|b| b.get("timeout")),
            Some(&json!(15))
        );
    }

    #[test]
    fn test_typing_saves_each_valid_keystroke() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());

        panel.delete_back(&mut controller).unwrap();
        assert_eq!(panel.timeout_text(), "");
        assert_eq!(controller.store().save_count(), 0);

        panel.insert_char('1', &mut controller).unwrap();
        panel.insert_char('0', &mut controller).unwrap();
        assert_eq!(controller.settings().timeout_minutes, 10);
        assert_eq!(controller.store().save_count(), 2);
    }

    #[test]
    fn test_unchanged_timeout_is_not_saved_again() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());

        assert!(!panel.set_timeout_text("5", &mut controller).unwrap());
        panel.insert_char('m', &mut controller).unwrap();
        assert_eq!(panel.timeout_text(), "5m");
        assert_eq!(controller.store().save_count(), 0);

        assert!(panel.set_timeout_text("6", &mut controller).unwrap());
        assert!(!panel.set_timeout_text("6 min", &mut controller).unwrap());
        assert_eq!(controller.store().save_count(), 1);
    }

    #[test]
    fn test_activate_toggles_and_cycles() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());

        assert!(!panel.activate(&mut controller).unwrap());

        panel.focus_next();
        assert_eq!(panel.focus(), PanelControl::PreviewOnStartup);
        panel.activate(&mut controller).unwrap();
        assert!(!controller.settings().preview_on_startup);

        panel.focus_next();
        panel.activate(&mut controller).unwrap();
        assert_eq!(
            controller.settings().startup_policy,
            StartupPolicy::AfterFirstLaunch
        );
        assert_eq!(controller.store().save_count(), 2);
    }

    #[test]
    fn test_focus_wraps() {
        let mut panel = SettingsPanel::default();
        panel.focus_prev();
        assert_eq!(panel.focus(), PanelControl::StartupPolicy);
        panel.focus_next();
        assert_eq!(panel.focus(), PanelControl::Timeout);
    }

    #[test]
    fn test_typing_ignored_when_toggle_focused() {
        let mut controller = controller();
        let mut panel = SettingsPanel::new(controller.settings());
        panel.focus_next();
        assert!(!panel.insert_char('9', &mut controller).unwrap());
        assert_eq!(panel.timeout_text(), "5");
    }

    #[test]
    fn test_rows_reflect_settings_and_focus() {
        let controller = controller();
        let panel = SettingsPanel::new(controller.settings());
        let rows = panel.rows(controller.settings());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Timeout (minutes)");
        assert_eq!(rows[0].value, "5");
        assert!(rows[0].focused);
        assert_eq!(rows[1].value, "on");
        assert!(!rows[1].focused);
    }
}
