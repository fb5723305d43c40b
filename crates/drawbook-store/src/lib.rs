//! Drawbook Store - local persistence for canvas documents
//!
//! This crate provides the durable layer under the canvas session:
//! - Document: the `CanvasDocument` record and the `Snapshot` triple
//! - Store: `DocumentStore`, a versioned SQLite table keyed by canvas id
//! - Preferences: small key/value slots kept outside the table (theme)
//! - Error: error types for storage operations
//!
//! ## Usage
//!
//! ```ignore
//! use drawbook_store::{CanvasDocument, DocumentStore};
//!
//! let store = DocumentStore::in_dir(&data_dir);
//! store.initialize().await?;
//!
//! store.upsert(&CanvasDocument::new("untitled", "Untitled")).await?;
//! let doc = store.get("untitled").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod preferences;
pub mod store;

pub use document::{now_millis, theme_of, CanvasDocument, Snapshot, THEME_FIELD};
pub use error::{Error, Result};
pub use preferences::{Preferences, DEFAULT_THEME, PREFERENCES_FILE, THEME_KEY};
pub use store::{default_data_dir, DocumentStore, StoreLocation, DB_NAME, SCHEMA_VERSION};
