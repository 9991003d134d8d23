use std::path::Path;

use museum_store::DEFAULT_OBJECTS_DIR;
use serde::{Deserialize, Serialize};

use crate::error::{fs_err, LibraryError, LibraryResult};
use crate::layout::{LOCK_FILE_NAME, WINGS_DIR};

/// Extension that marks an installed bundle inside an `Exhibits` directory.
pub const DEFAULT_BUNDLE_EXTENSION: &str = "exhibit";

/// Per-library settings.
///
/// Loaded from TOML; every field is optional and falls back to its default:
///
/// ```toml
/// objects_directory_name = "Objects"
/// bundle_extension = "exhibit"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory under the root holding content-addressed objects.
    pub objects_directory_name: String,
    /// Extension (without the dot) that `list_exhibits` reports.
    pub bundle_extension: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            objects_directory_name: DEFAULT_OBJECTS_DIR.to_string(),
            bundle_extension: DEFAULT_BUNDLE_EXTENSION.to_string(),
        }
    }
}

impl LibraryConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> LibraryResult<Self> {
        let text = std::fs::read_to_string(path).map_err(fs_err(path))?;
        let config: Self = toml::from_str(&text).map_err(|e| LibraryError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate().map_err(|reason| LibraryError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Check that both names are usable as single path components and do
    /// not collide with the fixed layout.
    pub fn validate(&self) -> Result<(), String> {
        let objects = self.objects_directory_name.as_str();
        if !is_plain_segment(objects) {
            return Err(format!("objects_directory_name {objects:?} is not a plain directory name"));
        }
        if objects == WINGS_DIR
            || objects == LOCK_FILE_NAME
            || objects == museum_index::MANIFEST_FILE_NAME
        {
            return Err(format!(
                "objects_directory_name {objects:?} collides with the library layout"
            ));
        }
        let ext = self.bundle_extension.as_str();
        if !is_plain_segment(ext) || ext.contains('.') {
            return Err(format!("bundle_extension {ext:?} must be a bare extension without dots"));
        }
        Ok(())
    }
}

fn is_plain_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}
