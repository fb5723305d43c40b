//! Canvas Session Controller
//!
//! Owns the in-memory session: which canvas is open (if any), the name shown
//! in the title field, and the selector list. Every change to a canvas goes
//! through the [`DocumentStore`]; in-memory state is only updated after the
//! store write succeeded, so a failed save/rename/create leaves the session
//! exactly as it was.
//!
//! ```text
//!            create_canvas / open_canvas
//!   Selector ───────────────────────────► Editing ─┐ save, rename
//!      ▲  │ delete_canvas                    │  ◄───┘
//!      └──┘                                  │
//!      ◄──────────── close_canvas ───────────┘
//! ```

use std::sync::Arc;

use drawbook_store::{
    now_millis, theme_of, CanvasDocument, DocumentStore, Preferences, Snapshot, THEME_KEY,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::keymap::{KeyChord, KeyOutcome};
use crate::naming::{self, UNTITLED};
use crate::surface::DrawingSurface;

/// Which view the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No canvas open; the canvas list is shown
    Selector,
    /// One canvas open in the drawing surface
    Editing,
}

/// Session controller for the canvas lifecycle
pub struct SessionController {
    store: Arc<DocumentStore>,
    preferences: Preferences,

    /// The open canvas as last persisted
    open: Option<CanvasDocument>,

    /// Name shown in the title field; may be mid-edit
    display_name: String,

    rename_in_progress: bool,

    /// Selector list, newest first
    canvases: Vec<CanvasDocument>,

    /// Scene the surface is (re)initialized with
    initial_scene: Option<Snapshot>,

    surface: Option<Box<dyn DrawingSurface>>,
}

fn report(action: &str, err: impl Into<Error>) -> Error {
    let err = err.into();
    error!(code = err.code(), "Failed to {action}: {err}");
    err
}

/// Modification time for a new version of `document`, always after its current one
fn next_timestamp(document: &CanvasDocument) -> i64 {
    now_millis().max(document.timestamp.saturating_add(1))
}

impl SessionController {
    /// Create a controller in the selector state
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, preferences: Preferences) -> Self {
        Self {
            store,
            preferences,
            open: None,
            display_name: UNTITLED.to_string(),
            rename_in_progress: false,
            canvases: Vec::new(),
            initial_scene: None,
            surface: None,
        }
    }

    /// Open the store and load the selector list
    pub async fn start(&mut self) -> Result<&[CanvasDocument]> {
        self.store
            .initialize()
            .await
            .map_err(|e| report("open canvas store", e))?;
        self.list_canvases().await
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current view
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.open.is_some() {
            SessionState::Editing
        } else {
            SessionState::Selector
        }
    }

    /// The open canvas, if any
    #[must_use]
    pub fn open_document(&self) -> Option<&CanvasDocument> {
        self.open.as_ref()
    }

    /// Name shown in the title field
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the title field is being edited
    #[must_use]
    pub fn is_renaming(&self) -> bool {
        self.rename_in_progress
    }

    /// Selector list as of the last refresh, newest first
    #[must_use]
    pub fn canvases(&self) -> &[CanvasDocument] {
        &self.canvases
    }

    /// Scene used to initialize the drawing surface
    #[must_use]
    pub fn initial_scene(&self) -> Option<&Snapshot> {
        self.initial_scene.as_ref()
    }

    /// Theme and other preference slots
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The backing store
    #[must_use]
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Whether a drawing surface is attached and ready
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether the save shortcut listener is attached
    #[must_use]
    pub fn shortcut_attached(&self) -> bool {
        self.open.is_some()
    }

    // ── Drawing surface ─────────────────────────────────────────

    /// Mount a drawing surface. It receives the pending initial scene, if any.
    pub fn attach_surface(&mut self, mut surface: Box<dyn DrawingSurface>) {
        if let Some(scene) = &self.initial_scene {
            surface.load_scene(scene);
        }
        self.surface = Some(surface);
    }

    /// Unmount the drawing surface
    pub fn detach_surface(&mut self) -> Option<Box<dyn DrawingSurface>> {
        self.surface.take()
    }

    /// Change notification from the surface carrying its live app state.
    ///
    /// Only the theme is looked at; a theme that differs from the stored
    /// one (or the first one reported) becomes the preference for future
    /// canvases.
    pub fn on_surface_change(&mut self, app_state: &Value) {
        let Some(theme) = theme_of(app_state) else {
            return;
        };
        if self.preferences.get(THEME_KEY) == Some(theme) {
            return;
        }
        match self.preferences.set_theme(theme) {
            Ok(()) => debug!("Theme preference set to {theme}"),
            Err(e) => warn!("Failed to store theme preference: {e}"),
        }
    }

    /// Route a key press. Ctrl/Cmd+S saves while a canvas is open.
    pub async fn handle_key(&mut self, chord: &KeyChord) -> KeyOutcome {
        if !self.shortcut_attached() || !chord.is_save() {
            return KeyOutcome::PassThrough;
        }
        if let Err(e) = self.save().await {
            debug!("Save shortcut did not save: {e}");
        }
        KeyOutcome::Consumed
    }

    // ── Selector ────────────────────────────────────────────────

    /// Reload every canvas from the store, newest first.
    pub async fn list_canvases(&mut self) -> Result<&[CanvasDocument]> {
        let mut canvases = self
            .store
            .get_all()
            .await
            .map_err(|e| report("load canvases", e))?;
        canvases.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        debug!("Loaded {} canvas(es)", canvases.len());
        self.canvases = canvases;
        Ok(&self.canvases)
    }

    /// Create, persist and open a new `Untitled` canvas.
    pub async fn create_canvas(&mut self) -> Result<&CanvasDocument> {
        let existing = self
            .store
            .get_all()
            .await
            .map_err(|e| report("create canvas", e))?;
        let (name, id) = naming::new_canvas_identity(&existing);
        let document = CanvasDocument::new(id, name).with_theme(self.preferences.theme());

        self.store
            .upsert(&document)
            .await
            .map_err(|e| report("create canvas", e))?;

        info!(canvas_id = %document.id, "Created \"{}\"", document.name);
        Ok(self.enter_editing(document))
    }

    /// Open a canvas that is already persisted. Nothing is written.
    pub fn open_canvas(&mut self, document: CanvasDocument) -> &CanvasDocument {
        debug!(canvas_id = %document.id, "Opening \"{}\"", document.name);
        self.enter_editing(document)
    }

    /// Look a canvas up by id and open it. `Ok(None)` if it does not exist.
    pub async fn open_by_id(&mut self, id: &str) -> Result<Option<&CanvasDocument>> {
        let found = self
            .store
            .get(id)
            .await
            .map_err(|e| report("load canvas", e))?;
        match found {
            Some(document) => Ok(Some(self.open_canvas(document))),
            None => Ok(None),
        }
    }

    /// Delete a canvas after the user confirmed. Only allowed from the selector.
    ///
    /// Returns `Ok(false)` when the confirmation was declined. Once the store
    /// delete succeeded the result is `Ok(true)`, even if the list refresh
    /// fails; the deleted canvas is dropped from the cached list either way.
    pub async fn delete_canvas<F>(&mut self, id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if let Some(open) = &self.open {
            warn!("Refusing to delete {id} while {} is open", open.id);
            return Err(Error::CanvasOpen(open.id.clone()));
        }
        if !confirm(id) {
            debug!("Delete of {id} declined");
            return Ok(false);
        }

        self.store
            .delete(id)
            .await
            .map_err(|e| report("delete canvas", e))?;
        info!(canvas_id = %id, "Deleted canvas");

        self.canvases.retain(|doc| doc.id != id);
        if let Err(e) = self.list_canvases().await {
            warn!("Canvas list not refreshed after delete: {e}");
        }
        Ok(true)
    }

    // ── Editing ─────────────────────────────────────────────────

    /// Persist the live scene of the open canvas under the current display name.
    ///
    /// Fails with [`Error::NoOpenCanvas`] when nothing is open or no surface
    /// is attached; nothing is written in that case.
    pub async fn save(&mut self) -> Result<&CanvasDocument> {
        let updated = match (self.open.as_ref(), self.surface.as_deref()) {
            (Some(open), Some(surface)) => CanvasDocument {
                id: open.id.clone(),
                name: self.display_name.clone(),
                elements: surface.scene_elements(),
                app_state: surface.app_state(),
                files: surface.files(),
                timestamp: next_timestamp(open),
            },
            (None, _) => {
                warn!("Save requested with no canvas open");
                return Err(Error::NoOpenCanvas);
            }
            (Some(_), None) => {
                warn!("Save requested before the drawing surface is ready");
                return Err(Error::NoOpenCanvas);
            }
        };

        self.store
            .upsert(&updated)
            .await
            .map_err(|e| report("save", e))?;

        info!(canvas_id = %updated.id, "Saved \"{}\"", updated.name);
        Ok(self.open.insert(updated))
    }

    /// Rename the open canvas. Blank names and a closed session are ignored.
    ///
    /// The id stays what it was at creation.
    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let Some(open) = self.open.as_ref() else {
            debug!("Rename ignored: no canvas open");
            return Ok(());
        };
        if new_name.trim().is_empty() {
            debug!("Rename ignored: blank name");
            return Ok(());
        }

        let updated = CanvasDocument {
            name: new_name.to_string(),
            timestamp: next_timestamp(open),
            ..open.clone()
        };
        self.store
            .upsert(&updated)
            .await
            .map_err(|e| report("rename", e))?;

        info!(canvas_id = %updated.id, "Renamed to \"{new_name}\"");
        self.display_name = new_name.to_string();
        self.open = Some(updated);
        Ok(())
    }

    /// Start editing the title field
    pub fn begin_rename(&mut self) {
        if self.open.is_some() {
            self.rename_in_progress = true;
        }
    }

    /// Update the title field while editing
    pub fn edit_name(&mut self, text: impl Into<String>) {
        if self.rename_in_progress {
            self.display_name = text.into();
        }
    }

    /// Leave the title field and rename to its content.
    ///
    /// A blank field puts the open canvas' name back.
    pub async fn commit_rename(&mut self) -> Result<()> {
        if !std::mem::take(&mut self.rename_in_progress) {
            return Ok(());
        }
        if self.display_name.trim().is_empty() {
            self.restore_display_name();
            return Ok(());
        }
        let name = self.display_name.clone();
        self.rename(&name).await
    }

    /// Leave the title field without renaming
    pub fn cancel_rename(&mut self) {
        self.rename_in_progress = false;
        self.restore_display_name();
    }

    /// Return to the selector and refresh the list.
    pub async fn close_canvas(&mut self) -> Result<&[CanvasDocument]> {
        if let Some(document) = self.open.take() {
            debug!(canvas_id = %document.id, "Closed canvas");
        }
        self.rename_in_progress = false;
        self.initial_scene = None;
        self.surface = None;
        self.list_canvases().await
    }

    fn enter_editing(&mut self, document: CanvasDocument) -> &CanvasDocument {
        let scene = document.snapshot();
        if let Some(surface) = self.surface.as_mut() {
            surface.load_scene(&scene);
        }
        self.display_name = document.name.clone();
        self.rename_in_progress = false;
        self.initial_scene = Some(scene);
        self.open.insert(document)
    }

    fn restore_display_name(&mut self) {
        if let Some(open) = &self.open {
            self.display_name = open.name.clone();
        }
    }
}
