//! Drawbook Session - canvas lifecycle on top of the document store
//!
//! This crate provides:
//! - Controller: `SessionController`, the selector/editing state machine
//! - Naming: `Untitled N` naming and id derivation for new canvases
//! - Surface: the `DrawingSurface` contract the editor implements
//! - Keymap: the Ctrl/Cmd+S save shortcut

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod keymap;
pub mod naming;
pub mod surface;

pub use controller::{SessionController, SessionState};
pub use error::{Error, Result};
pub use keymap::{KeyChord, KeyOutcome};
pub use naming::{derive_id, new_canvas_identity, next_untitled_name, UNTITLED};
pub use surface::{DrawingSurface, MemorySurface};
