//! Error types for the clause chunker.
//!
//! Per-document failures carry the offending path so that a stage can
//! report them and move on to the next document.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the clause chunker library.
#[derive(Debug, Error)]
pub enum ChunkerError {
    /// Input file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON or does not match the block tree contract.
    #[error("Failed to parse {}: {source}", .path.display())]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Block tree root has no `children` array.
    #[error("Block tree {} has no children array", .0.display())]
    MissingChildren(PathBuf),

    /// Schema file is structurally unusable.
    #[error("Invalid schema file {}: {reason}", .path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    /// Document id is empty or not usable as a storage key.
    #[error("Invalid document id: '{0}'")]
    InvalidDocumentId(String),

    /// A directory the stage depends on does not exist.
    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Path exists but is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A stage finished but some documents failed.
    #[error("{0} document(s) failed")]
    DocumentsFailed(usize),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for clause chunker operations.
pub type Result<T> = std::result::Result<T, ChunkerError>;
