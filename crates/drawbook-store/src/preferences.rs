//! Durable key/value preference slots
//!
//! Small scalar settings that live outside the document table, persisted as
//! a flat JSON object next to the database. The theme is the only slot the
//! session layer uses.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Slot holding the theme preference
pub const THEME_KEY: &str = "drawbook-theme";

/// Theme used when nothing has been stored yet
pub const DEFAULT_THEME: &str = "dark";

/// File name used by [`Preferences::in_dir`]
pub const PREFERENCES_FILE: &str = "preferences.json";

/// String key/value preferences with write-through persistence
#[derive(Debug, Clone)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
    default_theme: String,
}

impl Preferences {
    /// Load preferences from a JSON file.
    ///
    /// A missing file yields empty preferences. A file that exists but does
    /// not parse is logged and ignored, it will be overwritten on the next set.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::preference(format!("read {}: {e}", path.display())))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable preferences at {}: {e}", path.display());
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            values,
            default_theme: DEFAULT_THEME.to_string(),
        })
    }

    /// Load `<dir>/preferences.json`
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::load(dir.join(PREFERENCES_FILE))
    }

    /// Preferences that are never written to disk (for tests)
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
            default_theme: DEFAULT_THEME.to_string(),
        }
    }

    /// Override the theme reported when none is stored
    #[must_use]
    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    /// Backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read a slot
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Write a slot and persist. On failure the in-memory value is unchanged.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.into());
        self.persist(&values)?;
        self.values = values;
        Ok(())
    }

    /// Current theme, falling back to the default
    #[must_use]
    pub fn theme(&self) -> &str {
        self.get(THEME_KEY).unwrap_or(&self.default_theme)
    }

    /// Store the theme
    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.set(THEME_KEY, theme)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::preference(format!("mkdir: {e}")))?;
        }

        // Write then rename so a crash never leaves a half-written file
        let content = serde_json::to_string_pretty(values)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| Error::preference(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| Error::preference(format!("rename {}: {e}", path.display())))?;

        debug!("Preferences written to {}", path.display());
        Ok(())
    }
}
