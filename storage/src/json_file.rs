//! Raw JSON file primitives: read into a typed record, write atomically with 4-space indentation.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::error::{Result, StorageError};

/// How [`write`] treats an existing target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file if present.
    Overwrite,
    /// Fail with [`StorageError::AlreadyExists`] if present.
    CreateNew,
}

/// Reads and parses `path`. A missing file yields `Ok(None)`; malformed content yields
/// [`StorageError::Validation`].
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "File not found");
            return Ok(None);
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read file");
            return Err(StorageError::io(path, e));
        }
    };
    let value = serde_json::from_str(&content).map_err(|source| {
        error!(path = %path.display(), error = %source, "File content failed validation");
        StorageError::Validation {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(path = %path.display(), "File loaded");
    Ok(Some(value))
}

/// Serializes `value` with 4-space indentation.
pub fn to_pretty_bytes<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes `value` to `path` through a temp file in the same directory, then renames it into
/// place. Parent directories are created.
pub fn write<T: Serialize>(path: &Path, value: &T, mode: WriteMode) -> Result<()> {
    let bytes = to_pretty_bytes(value).map_err(|source| StorageError::Validation {
        path: path.to_path_buf(),
        source,
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;

    if mode == WriteMode::CreateNew && path.exists() {
        warn!(path = %path.display(), "Refusing to overwrite existing file");
        return Err(StorageError::AlreadyExists(path.to_path_buf()));
    }

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StorageError::io(parent, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StorageError::io(tmp.path(), e))?;

    let persisted = match mode {
        WriteMode::Overwrite => tmp.persist(path),
        WriteMode::CreateNew => tmp.persist_noclobber(path),
    };
    persisted.map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            StorageError::AlreadyExists(path.to_path_buf())
        } else {
            error!(path = %path.display(), error = %e.error, "Failed to persist file");
            StorageError::io(path, e.error)
        }
    })?;

    info!(path = %path.display(), "File saved");
    Ok(())
}
