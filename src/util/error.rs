//! Error types for the bounds codec.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for load/save operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A flat-array entry violates the bounds structure (bad child range,
    /// multiply-claimed child, unknown flag, dangling point-cloud index...).
    #[error("Malformed bounds entry {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// Document-level violation: missing field, invalid enum value, numeric overflow.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// String dictionary missing or unreadable. Never fatal for decode/encode,
    /// the resolver degrades to hex names instead.
    #[error("String dictionary unavailable ({path}): {reason}")]
    DictionaryUnavailable { path: PathBuf, reason: String },

    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax or shape error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a document-level malformed input error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create a malformed entry error for flat-array index `index`.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedEntry { index, reason: reason.into() }
    }

    /// Flat-array index this error points at, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Self::MalformedEntry { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True for structural errors that abort a decode/encode.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEntry { .. } | Self::MalformedInput(_) | Self::Json(_))
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
