//! Storage error types.
//!
//! A missing file on `load` is not an error (`Ok(None)`); everything below is propagated to the
//! caller after being logged.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// File content does not match the expected record shape (or could not be serialized).
    #[error("Invalid record at {path}: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("Already exists: {0}")]
    AlreadyExists(PathBuf),
    /// Disk or permission failure while reading or writing.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Id that cannot be used as a file name (empty, `..`, path separators).
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
