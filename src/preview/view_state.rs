use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the mode field inside a view's nested `state` object.
pub const MODE_KEY: &str = "mode";

/// Display mode of a document view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Raw editable text ("edit mode").
    Source,
    /// Read-only rendered presentation ("reading mode").
    Preview,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Preview => "preview",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "source" => Some(Self::Source),
            "preview" => Some(Self::Preview),
            _ => None,
        }
    }
}

/// Serialized state of one open document view.
///
/// The record is treated as opaque: hosts may stash arbitrary fields both at
/// the top level and inside `state`. Every transformation copies the record
/// and overrides a single field, so fields this crate does not know about
/// survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// View type tag, e.g. `"markdown"`.
    #[serde(rename = "type")]
    pub view_type: String,
    /// View-specific state; holds the `mode` field among host fields.
    #[serde(default)]
    pub state: Map<String, Value>,
    /// Any other host fields (`active`, `pinned`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewState {
    pub fn new(view_type: impl Into<String>) -> Self {
        Self {
            view_type: view_type.into(),
            state: Map::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style helper for seeding a nested state field.
    #[must_use]
    pub fn with_state_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// The mode stored in the nested state, if it is one we recognise.
    pub fn mode(&self) -> Option<ViewMode> {
        self.state
            .get(MODE_KEY)
            .and_then(Value::as_str)
            .and_then(ViewMode::parse)
    }

    /// A copy of this state with only the mode replaced.
    #[must_use]
    pub fn with_mode(&self, mode: ViewMode) -> Self {
        let mut next = self.clone();
        next.state
            .insert(MODE_KEY.to_string(), Value::String(mode.as_str().to_string()));
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_mode_preserves_unknown_fields() {
        let original: ViewState = serde_json::from_value(json!({
            "type": "markdown",
            "active": true,
            "state": { "file": "notes/today.md", "mode": "source", "source": false, "scroll": 42 }
        }))
        .unwrap();

        let next = original.with_mode(ViewMode::Preview);

        assert_eq!(next.mode(), Some(ViewMode::Preview));
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({
                "type": "markdown",
                "active": true,
                "state": { "file": "notes/today.md", "mode": "preview", "source": false, "scroll": 42 }
            })
        );
        // The input is never mutated in place.
        assert_eq!(original.mode(), Some(ViewMode::Source));
    }

    #[test]
    fn test_missing_state_object_deserializes_empty() {
        let vs: ViewState = serde_json::from_value(json!({ "type": "empty" })).unwrap();
        assert!(vs.state.is_empty());
        assert_eq!(vs.mode(), None);
    }

    #[test]
    fn test_unrecognised_mode_reads_as_none() {
        let vs = ViewState::new("markdown").with_state_field("mode", "live");
        assert_eq!(vs.mode(), None);
        assert_eq!(vs.with_mode(ViewMode::Source).mode(), Some(ViewMode::Source));
    }
}
