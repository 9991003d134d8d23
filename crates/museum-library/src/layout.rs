use std::path::{Path, PathBuf};

use museum_types::StableId;

/// Directory under the root holding one subdirectory per wing.
pub const WINGS_DIR: &str = "Wings";

/// Subdirectory of a wing holding its installed bundles.
pub const EXHIBITS_DIR: &str = "Exhibits";

/// Advisory lock file at the library root.
pub const LOCK_FILE_NAME: &str = ".museum.lock";

pub(crate) fn wings_dir(root: &Path) -> PathBuf {
    root.join(WINGS_DIR)
}

pub(crate) fn wing_dir(root: &Path, wing: &StableId) -> PathBuf {
    wings_dir(root).join(wing.as_str())
}

pub(crate) fn exhibits_dir(root: &Path, wing: &StableId) -> PathBuf {
    wing_dir(root, wing).join(EXHIBITS_DIR)
}

pub(crate) fn lock_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE_NAME)
}
