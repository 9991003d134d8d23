use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use tracing::warn;

use crate::error::{fs_err, LibraryResult};
use crate::layout::lock_path;

/// Advisory lock on `<root>/.museum.lock`, released on drop.
///
/// Only cooperating museum processes honor it. It serializes manifest
/// read-modify-write against other writers and against backups.
pub struct LibraryLock {
    file: File,
}

impl LibraryLock {
    /// Block until no other holder has the lock.
    pub fn exclusive(root: &Path) -> LibraryResult<Self> {
        let file = open_lock_file(root)?;
        FileExt::lock_exclusive(&file).map_err(fs_err(&lock_path(root)))?;
        Ok(Self { file })
    }

    /// Block until no exclusive holder has the lock.
    pub fn shared(root: &Path) -> LibraryResult<Self> {
        let file = open_lock_file(root)?;
        FileExt::lock_shared(&file).map_err(fs_err(&lock_path(root)))?;
        Ok(Self { file })
    }
}

impl Drop for LibraryLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(error = %e, "failed to release library lock");
        }
    }
}

pub(crate) fn open_lock_file(root: &Path) -> LibraryResult<File> {
    let path = lock_path(root);
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(fs_err(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_locks_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let a = LibraryLock::shared(dir.path()).unwrap();
        let b = LibraryLock::shared(dir.path()).unwrap();
        drop((a, b));
        assert!(lock_path(dir.path()).is_file());
    }

    #[test]
    fn exclusive_is_reacquirable_after_drop() {
        let dir = tempfile::tempdir().unwrap();
        drop(LibraryLock::exclusive(dir.path()).unwrap());
        let again = LibraryLock::exclusive(dir.path()).unwrap();
        drop(again);
    }

    #[test]
    fn exclusive_blocks_second_holder() {
        let dir = tempfile::tempdir().unwrap();
        let _held = LibraryLock::exclusive(dir.path()).unwrap();
        let other = open_lock_file(dir.path()).unwrap();
        assert!(FileExt::try_lock_exclusive(&other).is_err());
    }
}
