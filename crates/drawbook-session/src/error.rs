//! Error types for drawbook-session

use thiserror::Error;

/// Session error type
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] drawbook_store::Error),

    /// Save attempted with nothing open or the drawing surface not ready
    #[error("no canvas is open")]
    NoOpenCanvas,

    /// Delete attempted while a canvas is being edited
    #[error("cannot delete while canvas {0} is open")]
    CanvasOpen(String),
}

impl Error {
    /// Stable error code for logs and CLI output
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.code(),
            Self::NoOpenCanvas => "no_open_canvas",
            Self::CanvasOpen(_) => "canvas_open",
        }
    }

    /// Whether trying the same operation again could succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_recoverable(),
            Self::NoOpenCanvas | Self::CanvasOpen(_) => false,
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;
