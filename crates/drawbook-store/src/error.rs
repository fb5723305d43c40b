//! Error types for drawbook-store
//!
//! Storage failures are split by the operation that hit them so the
//! session layer can tell an unopenable database from a failed write.

use thiserror::Error;

/// Store error type
#[derive(Debug, Error)]
pub enum Error {
    /// The database could not be opened (storage disabled, blocked, or too new)
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An upsert or delete failed at the engine level
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A lookup or enumeration failed at the engine level
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A stored payload could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The preference file could not be read or written
    #[error("preference error: {0}")]
    Preference(String),
}

impl Error {
    /// Create a store-unavailable error
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a write error
    #[must_use]
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteFailed(msg.into())
    }

    /// Create a read error
    #[must_use]
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Create a preference error
    #[must_use]
    pub fn preference(msg: impl Into<String>) -> Self {
        Self::Preference(msg.into())
    }

    /// Whether trying the same operation again could succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::WriteFailed(_) | Self::ReadFailed(_))
    }

    /// Stable error code for logs and CLI output
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::WriteFailed(_) => "write_failed",
            Self::ReadFailed(_) => "read_failed",
            Self::Serialization(_) => "serialization_error",
            Self::Preference(_) => "preference_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;
