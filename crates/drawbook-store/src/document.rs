//! Canvas Document Types
//!
//! A canvas document is the unit of persistence. Everything the drawing
//! surface owns (`elements`, `app_state`, `files`) is carried as opaque JSON
//! and must round-trip value-for-value; the store never looks inside it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the only `app_state` field the core reads or writes
pub const THEME_FIELD: &str = "theme";

/// One persisted drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Stable identifier, derived from the name at creation
    pub id: String,

    /// Display name
    pub name: String,

    /// Ordered element records owned by the drawing surface
    #[serde(default)]
    pub elements: Vec<Value>,

    /// Surface configuration bag (theme, viewport, tool state, ...)
    #[serde(default)]
    pub app_state: Value,

    /// Embedded file metadata keyed by file id
    #[serde(default)]
    pub files: Map<String, Value>,

    /// Milliseconds since the Unix epoch of the last successful write
    pub timestamp: i64,
}

impl CanvasDocument {
    /// Create an empty document stamped with the current time
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elements: Vec::new(),
            app_state: Value::Object(Map::new()),
            files: Map::new(),
            timestamp: now_millis(),
        }
    }

    /// Set the theme in `app_state`
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        if !self.app_state.is_object() {
            self.app_state = Value::Object(Map::new());
        }
        if let Value::Object(state) = &mut self.app_state {
            state.insert(THEME_FIELD.to_string(), Value::String(theme.into()));
        }
        self
    }

    /// Theme recorded in `app_state`, if any
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        theme_of(&self.app_state)
    }

    /// The scene triple handed to a drawing surface
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            app_state: self.app_state.clone(),
            files: self.files.clone(),
        }
    }
}

/// The `{elements, appState, files}` triple exchanged with the drawing surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Element records
    #[serde(default)]
    pub elements: Vec<Value>,

    /// Surface configuration bag
    #[serde(default)]
    pub app_state: Value,

    /// Embedded file metadata
    #[serde(default)]
    pub files: Map<String, Value>,
}

/// Read the `theme` field of an app-state bag
#[must_use]
pub fn theme_of(app_state: &Value) -> Option<&str> {
    app_state.get(THEME_FIELD).and_then(Value::as_str)
}

/// Current wall-clock time in epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_is_empty() {
        let doc = CanvasDocument::new("untitled", "Untitled");
        assert!(doc.elements.is_empty());
        assert!(doc.files.is_empty());
        assert!(doc.timestamp > 0);
        assert_eq!(doc.theme(), None);
    }

    #[test]
    fn test_with_theme() {
        let doc = CanvasDocument::new("a", "A").with_theme("light");
        assert_eq!(doc.theme(), Some("light"));
        assert_eq!(doc.app_state, json!({ "theme": "light" }));
    }

    #[test]
    fn test_with_theme_replaces_non_object_state() {
        let mut doc = CanvasDocument::new("a", "A");
        doc.app_state = Value::Null;
        let doc = doc.with_theme("dark");
        assert_eq!(doc.theme(), Some("dark"));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let doc = CanvasDocument::new("a", "A").with_theme("dark");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("appState").is_some());
        assert!(value.get("app_state").is_none());
    }

    #[test]
    fn test_snapshot_copies_scene() {
        let mut doc = CanvasDocument::new("a", "A");
        doc.elements.push(json!({ "type": "rectangle", "x": 1.5 }));
        doc.files.insert("f1".into(), json!({ "mimeType": "image/png" }));

        let snapshot = doc.snapshot();
        assert_eq!(snapshot.elements, doc.elements);
        assert_eq!(snapshot.files, doc.files);
        assert_eq!(snapshot.app_state, doc.app_state);
    }
}
