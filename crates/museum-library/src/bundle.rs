use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A self-contained package the library installs as an opaque unit.
///
/// The library never looks inside a bundle; it only needs to know where the
/// bundle lives and what to call it once installed.
pub trait Bundle {
    /// The bundle's own location on disk (a file or a directory).
    fn location(&self) -> &Path;

    /// Name to install under. Defaults to the last segment of `location`.
    fn name(&self) -> Option<&OsStr> {
        self.location().file_name()
    }
}

/// A bundle identified only by its path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathBundle {
    path: PathBuf,
}

impl PathBundle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Bundle for PathBundle {
    fn location(&self) -> &Path {
        &self.path
    }
}
