//! Save shortcut
//!
//! Ctrl+S (Cmd+S on macOS) saves the open canvas. The listener is only
//! attached while a canvas is open; in the selector every chord passes
//! through untouched.

/// A key press with its modifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    /// Key value as reported by the host (`"s"`, `"S"`, `"Enter"`, ...)
    pub key: String,
    /// Control held
    pub ctrl: bool,
    /// Meta / Command held
    pub meta: bool,
    /// Shift held
    pub shift: bool,
    /// Alt / Option held
    pub alt: bool,
}

impl KeyChord {
    /// A bare key
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// The key with Control held
    #[must_use]
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    /// The key with Meta / Command held
    #[must_use]
    pub fn meta(key: impl Into<String>) -> Self {
        Self {
            meta: true,
            ..Self::key(key)
        }
    }

    /// Whether this chord is the save shortcut (Ctrl/Cmd + S, any case)
    #[must_use]
    pub fn is_save(&self) -> bool {
        (self.ctrl || self.meta) && self.key.eq_ignore_ascii_case("s")
    }
}

/// What the host should do with a key press after the controller saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed: suppress the host's default action and stop propagation
    Consumed,
    /// Not ours: let the host handle it normally
    PassThrough,
}

impl KeyOutcome {
    /// Whether the host's default action must be suppressed
    #[must_use]
    pub fn prevents_default(self) -> bool {
        self == Self::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_chords() {
        assert!(KeyChord::ctrl("s").is_save());
        assert!(KeyChord::ctrl("S").is_save());
        assert!(KeyChord::meta("s").is_save());
    }

    #[test]
    fn test_non_save_chords() {
        assert!(!KeyChord::key("s").is_save());
        assert!(!KeyChord::ctrl("a").is_save());
        assert!(!KeyChord::ctrl("ss").is_save());
        assert!(!KeyChord {
            key: "s".into(),
            shift: true,
            alt: true,
            ..KeyChord::default()
        }
        .is_save());
    }

    #[test]
    fn test_outcome_prevents_default() {
        assert!(KeyOutcome::Consumed.prevents_default());
        assert!(!KeyOutcome::PassThrough.prevents_default());
    }
}
