//! Persisted user settings.
//!
//! Settings are stored as a small JSON object. Loading merges whatever is
//! stored over [`Settings::default`], so fields added or removed between
//! releases never break an existing file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Minutes of inactivity before documents switch to reading mode.
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 5;

/// When the one-shot startup preview pass is allowed to run.
#[derive(
    clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StartupPolicy {
    /// Run as soon as the layout is ready, even with nothing open.
    LayoutReady,
    /// Run once the first markdown view exists in this launch.
    #[default]
    FirstView,
    /// Like `FirstView`, but never on the very first launch of the app.
    AfterFirstLaunch,
}

impl StartupPolicy {
    pub const ALL: [Self; 3] = [Self::LayoutReady, Self::FirstView, Self::AfterFirstLaunch];

    pub const fn label(self) -> &'static str {
        match self {
            Self::LayoutReady => "when layout is ready",
            Self::FirstView => "when the first document opens",
            Self::AfterFirstLaunch => "from the second launch on",
        }
    }

    /// The policy after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "timeout")]
    pub timeout_minutes: u32,
    #[serde(rename = "isReadingModeOnStartup", alias = "previewOnStartup")]
    pub preview_on_startup: bool,
    #[serde(rename = "startupPolicy")]
    pub startup_policy: StartupPolicy,
    #[serde(rename = "hasStartedOnce")]
    pub has_started_once: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            preview_on_startup: true,
            startup_policy: StartupPolicy::default(),
            has_started_once: false,
        }
    }
}

impl Settings {
    /// Merge a stored blob over the defaults.
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] if a stored field has the wrong type.
    pub fn from_blob(blob: Option<Value>) -> Result<Self, SettingsError> {
        match blob {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value).map_err(SettingsError::Parse),
        }
    }

    /// Serialize for the store.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialize`] if serialization fails.
    pub fn to_blob(&self) -> Result<Value, SettingsError> {
        serde_json::to_value(self).map_err(SettingsError::Serialize)
    }

    /// Inactivity timeout in milliseconds.
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_minutes as u64 * 60_000
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings are not valid: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Host storage for the opaque settings blob.
pub trait SettingsStore {
    /// The stored blob, or `None` if nothing was ever saved.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be read.
    fn load_data(&mut self) -> Result<Option<Value>, SettingsError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be written.
    fn save_data(&mut self, data: &Value) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Box<T> {
    fn load_data(&mut self) -> Result<Option<Value>, SettingsError> {
        (**self).load_data()
    }

    fn save_data(&mut self, data: &Value) -> Result<(), SettingsError> {
        (**self).save_data(data)
    }
}

/// Settings kept in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load_data(&mut self) -> Result<Option<Value>, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(SettingsError::Parse)
    }

    fn save_data(&mut self, data: &Value) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(data).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, format!("{text}\n")).map_err(write_err)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Settings kept in memory. Counts saves so callers can observe write-through.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<Value>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_blob(blob: Value) -> Self {
        Self {
            blob: Some(blob),
            saves: 0,
        }
    }

    pub const fn blob(&self) -> Option<&Value> {
        self.blob.as_ref()
    }

    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemoryStore {
    fn load_data(&mut self) -> Result<Option<Value>, SettingsError> {
        Ok(self.blob.clone())
    }

    fn save_data(&mut self, data: &Value) -> Result<(), SettingsError> {
        self.blob = Some(data.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Session overrides from the command line. `None` leaves the stored value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub timeout_minutes: Option<u32>,
    pub preview_on_startup: Option<bool>,
    pub startup_policy: Option<StartupPolicy>,
}

impl SettingsOverrides {
    /// Overrides layered on top of `base`.
    pub const fn apply(&self, base: &Settings) -> Settings {
        Settings {
            timeout_minutes: match self.timeout_minutes {
                Some(v) => v,
                None => base.timeout_minutes,
            },
            preview_on_startup: match self.preview_on_startup {
                Some(v) => v,
                None => base.preview_on_startup,
            },
            startup_policy: match self.startup_policy {
                Some(v) => v,
                None => base.startup_policy,
            },
            has_started_once: base.has_started_once,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.timeout_minutes.is_none()
            && self.preview_on_startup.is_none()
            && self.startup_policy.is_none()
    }
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("autoread").join("settings.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("autoread")
                .join("settings.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("autoread").join("settings.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("autoread")
                .join("settings.json");
        }
    }

    PathBuf::from(".autoread.json")
}

/// Remove a settings file if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_settings(path: &Path) -> Result<(), SettingsError> {
    if path.exists() {
        fs::remove_file(path).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_blob_yields_defaults() {
        assert_eq!(Settings::from_blob(None).unwrap(), Settings::default());
        assert_eq!(
            Settings::from_blob(Some(Value::Null)).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let settings = Settings::from_blob(Some(json!({}))).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timeout_minutes, 5);
        assert!(settings.preview_on_startup);
    }

    #[test]
    fn test_partial_blob_keeps_default_startup_flag() {
        let settings = Settings::from_blob(Some(json!({ "timeout": 12 }))).unwrap();
        assert_eq!(settings.timeout_minutes, 12);
        assert!(settings.preview_on_startup);
        assert_eq!(settings.startup_policy, StartupPolicy::FirstView);
    }

    #[test]
    fn test_legacy_and_alias_fields_are_read() {
        let legacy = Settings::from_blob(Some(json!({
            "timeout": 1,
            "isReadingModeOnStartup": false,
            "hasStartedOnce": true
        })))
        .unwrap();
        assert!(!legacy.preview_on_startup);
        assert!(legacy.has_started_once);

        let aliased = Settings::from_blob(Some(json!({ "previewOnStartup": false }))).unwrap();
        assert!(!aliased.preview_on_startup);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let settings =
            Settings::from_blob(Some(json!({ "timeout": 3, "theme": "dark" }))).unwrap();
        assert_eq!(settings.timeout_minutes, 3);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = Settings::from_blob(Some(json!({ "timeout": "five" }))).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_blob_uses_persisted_field_names() {
        let blob = Settings::default().to_blob().unwrap();
        assert_eq!(
            blob,
            json!({
                "timeout": 5,
                "isReadingModeOnStartup": true,
                "startupPolicy": "firstView",
                "hasStartedOnce": false
            })
        );
    }

    #[test]
    fn test_timeout_ms() {
        let settings = Settings {
            timeout_minutes: 5,
            ..Settings::default()
        };
        assert_eq!(settings.timeout_ms(), 300_000);
    }

    #[test]
    fn test_json_file_store_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut store = JsonFileStore::new(&path);

        assert_eq!(store.load_data().unwrap(), None);

        let settings = Settings {
            timeout_minutes: 9,
            preview_on_startup: false,
            startup_policy: StartupPolicy::LayoutReady,
            has_started_once: true,
        };
        store.save_data(&settings.to_blob().unwrap()).unwrap();
        let loaded = Settings::from_blob(store.load_data().unwrap()).unwrap();
        assert_eq!(loaded, settings);

        clear_settings(&path).unwrap();
        assert!(!path.exists());
        clear_settings(&path).unwrap();
    }

    #[test]
    fn test_json_file_store_treats_blank_file_as_unset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(JsonFileStore::new(&path).load_data().unwrap(), None);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        store.save_data(&json!({ "timeout": 1 })).unwrap();
        store.save_data(&json!({ "timeout": 2 })).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.blob(), Some(&json!({ "timeout": 2 })));
    }

    #[test]
    fn test_overrides_win_over_base() {
        let base = Settings {
            timeout_minutes: 10,
            has_started_once: true,
            ..Settings::default()
        };
        let overrides = SettingsOverrides {
            preview_on_startup: Some(false),
            ..SettingsOverrides::default()
        };
        let merged = overrides.apply(&base);
        assert_eq!(merged.timeout_minutes, 10);
        assert!(!merged.preview_on_startup);
        assert!(merged.has_started_once);
        assert!(SettingsOverrides::default().is_empty());
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_policy_cycles_through_all() {
        let mut policy = StartupPolicy::LayoutReady;
        for expected in [
            StartupPolicy::FirstView,
            StartupPolicy::AfterFirstLaunch,
            StartupPolicy::LayoutReady,
        ] {
            policy = policy.next();
            assert_eq!(policy, expected);
        }
    }
}
