//! Error types for intelliclima-store.

use std::path::PathBuf;

/// Result type for intelliclima-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in intelliclima-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to create the data directory.
    #[error("Failed to create data directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A cached timestamp cannot be represented.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
