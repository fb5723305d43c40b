//! Drawing surface contract
//!
//! The drawing surface (shape editing, rendering, input) lives outside this
//! crate. The controller only needs to hand it an initial scene and to read
//! the live scene back when saving.

use std::sync::{Arc, Mutex, MutexGuard};

use drawbook_store::Snapshot;
use serde_json::{Map, Value};

/// A component that displays and edits one scene
pub trait DrawingSurface: Send {
    /// (Re)initialize the surface with a scene
    fn load_scene(&mut self, scene: &Snapshot);

    /// Current element records
    fn scene_elements(&self) -> Vec<Value>;

    /// Current configuration bag
    fn app_state(&self) -> Value;

    /// Current embedded file metadata
    fn files(&self) -> Map<String, Value>;

    /// The three accessors bundled together
    fn current_scene(&self) -> Snapshot {
        Snapshot {
            elements: self.scene_elements(),
            app_state: self.app_state(),
            files: self.files(),
        }
    }
}

/// In-process surface whose scene can be edited through any clone.
///
/// Clones share the same scene, so a caller can keep a handle after giving
/// one to the controller.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    scene: Arc<Mutex<Snapshot>>,
}

impl MemorySurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the element list, as if the user had drawn
    pub fn set_elements(&self, elements: Vec<Value>) {
        self.lock().elements = elements;
    }

    /// Replace the configuration bag
    pub fn set_app_state(&self, app_state: Value) {
        self.lock().app_state = app_state;
    }

    /// Add or replace an embedded file
    pub fn insert_file(&self, id: impl Into<String>, file: Value) {
        self.lock().files.insert(id.into(), file);
    }

    /// Copy of the current scene
    #[must_use]
    pub fn scene(&self) -> Snapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.scene.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DrawingSurface for MemorySurface {
    fn load_scene(&mut self, scene: &Snapshot) {
        *self.lock() = scene.clone();
    }

    fn scene_elements(&self) -> Vec<Value> {
        self.lock().elements.clone()
    }

    fn app_state(&self) -> Value {
        self.lock().app_state.clone()
    }

    fn files(&self) -> Map<String, Value> {
        self.lock().files.clone()
    }
}
