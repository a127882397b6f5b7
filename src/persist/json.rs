//! JSON file storage with whole-file replacement.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use super::{
    DocumentSink, PersistError, PersistResult,
    document::{self, StoreDocument},
};

/// Reads and parses `path`; `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> PersistResult<Option<T>> {
    let Some(bytes) = read_optional(path)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Writes `value` as pretty JSON to a sibling temp file, then renames it over `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> PersistResult<()> {
    let payload = serde_json::to_vec_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&payload)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_optional(path: &Path) -> PersistResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

/// Where [`JsonFileSink`] moves a document it could not parse.
pub fn corrupt_path(path: &Path) -> PathBuf {
    sibling(path, ".corrupt")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// [`DocumentSink`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Sink for the document at `path`. Nothing is read until [`DocumentSink::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Document file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for JsonFileSink {
    fn load(&mut self) -> PersistResult<Option<StoreDocument>> {
        let Some(bytes) = read_optional(&self.path)? else {
            return Ok(None);
        };
        document::decode(&bytes)
            .map(Some)
            .map_err(PersistError::Corrupt)
    }

    fn save(&mut self, doc: &StoreDocument) -> PersistResult<()> {
        write_json_atomic(&self.path, doc)?;
        tracing::trace!(path = %self.path.display(), plants = doc.cactuses.len(), "store document saved");
        Ok(())
    }

    fn preserve_unreadable(&mut self) -> PersistResult<()> {
        let target = corrupt_path(&self.path);
        match fs::rename(&self.path, &target) {
            Ok(()) => {
                tracing::warn!(path = %target.display(), "unreadable document kept aside");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
