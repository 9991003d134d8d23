//! Reading and writing `museum.json`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{IndexError, IndexResult};
use crate::index::LibraryIndex;

/// File name of the manifest at the library root.
pub const MANIFEST_FILE_NAME: &str = "museum.json";

/// Location of the manifest for a library rooted at `root`.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE_NAME)
}

/// Load and decode the manifest of the library at `root`.
pub fn read_index(root: &Path) -> IndexResult<LibraryIndex> {
    let path = manifest_path(root);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(IndexError::ManifestNotFound(path));
        }
        Err(e) => return Err(IndexError::Io(e)),
    };
    let index: LibraryIndex =
        serde_json::from_slice(&bytes).map_err(|source| IndexError::Malformed {
            path: path.clone(),
            source,
        })?;
    index.validate().map_err(|source| IndexError::Invalid {
        path: path.clone(),
        source: Box::new(source),
    })?;
    debug!(path = %path.display(), wings = index.len(), "manifest read");
    Ok(index)
}

/// Validate, encode, and atomically replace the manifest at `root`.
///
/// The previous manifest is overwritten in full. `root` must already exist.
pub fn write_index(root: &Path, index: &LibraryIndex) -> IndexResult<()> {
    index.validate()?;
    let bytes = encode(index)?;

    let path = manifest_path(root);
    let mut tmp = NamedTempFile::new_in(root)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| IndexError::Io(e.error))?;
    debug!(path = %path.display(), wings = index.len(), "manifest written");
    Ok(())
}

/// Pretty JSON with recursively sorted keys and a trailing newline.
pub(crate) fn encode(index: &LibraryIndex) -> IndexResult<Vec<u8>> {
    let value = sort_keys(serde_json::to_value(index)?);
    let mut bytes = serde_json::to_vec_pretty(&value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

// Rebuilds every object with keys inserted in order, so the output is sorted
// whether or not serde_json keeps insertion order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
