//! Sealed whole-library backup and restore.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use museum_crypto::{open, seal, BackupKey};
use tempfile::NamedTempFile;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::archive::{pack_tree, unpack_tree};
use crate::error::{fs_err, LibraryError, LibraryResult};
use crate::library::MuseumLibrary;
use crate::lock::LibraryLock;

impl MuseumLibrary {
    /// Serialize the whole library tree and write it, sealed, to `destination`.
    ///
    /// Holds the shared library lock while reading so no manifest update
    /// lands mid-archive. The container is written to a temp file beside
    /// `destination` and renamed over it, replacing any previous backup.
    /// `destination` must lie outside the library root, or every backup
    /// would carry the previous one.
    pub fn backup(&self, destination: &Path, key: &BackupKey) -> LibraryResult<()> {
        let root = self.root();
        let library = root.canonicalize().map_err(fs_err(root))?;
        if resolve_path(destination)
            .map_err(fs_err(destination))?
            .starts_with(&library)
        {
            return Err(LibraryError::BackupInsideLibrary(destination.to_path_buf()));
        }

        let plaintext = {
            let _lock = LibraryLock::shared(root)?;
            Zeroizing::new(pack_tree(root).map_err(fs_err(root))?)
        };
        let sealed = seal(key, &plaintext)?;

        let parent = parent_dir(destination);
        fs::create_dir_all(parent).map_err(fs_err(parent))?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(fs_err(parent))?;
        tmp.write_all(&sealed).map_err(fs_err(tmp.path()))?;
        tmp.as_file().sync_all().map_err(fs_err(destination))?;
        tmp.persist(destination).map_err(|e| fs_err(destination)(e.error))?;

        info!(
            root = %root.display(),
            destination = %destination.display(),
            archive_bytes = plaintext.len(),
            sealed_bytes = sealed.len(),
            "backup written"
        );
        Ok(())
    }

    /// Decrypt the backup at `from` and recreate the library tree at `to`.
    ///
    /// `to` must not exist. Decrypted data only ever touches disk inside
    /// hidden temp entries next to `to`, which are removed on every path;
    /// the finished tree is moved into place with a single rename.
    pub fn restore(from: &Path, key: &BackupKey, to: &Path) -> LibraryResult<()> {
        if to.symlink_metadata().is_ok() {
            return Err(LibraryError::DestinationExists(to.to_path_buf()));
        }
        let sealed = match fs::read(from) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LibraryError::BackupNotFound(from.to_path_buf()));
            }
            Err(e) => return Err(fs_err(from)(e)),
        };
        let plaintext = Zeroizing::new(open(key, &sealed)?);

        let parent = parent_dir(to);
        fs::create_dir_all(parent).map_err(fs_err(parent))?;

        let mut archive = tempfile::Builder::new()
            .prefix(".museum-restore-")
            .tempfile_in(parent)
            .map_err(fs_err(parent))?;
        archive.write_all(&plaintext).map_err(fs_err(archive.path()))?;
        archive.flush().map_err(fs_err(archive.path()))?;
        drop(plaintext);

        let staging = tempfile::Builder::new()
            .prefix(".museum-staging-")
            .tempdir_in(parent)
            .map_err(fs_err(parent))?;
        let reader = archive.reopen().map_err(fs_err(archive.path()))?;
        unpack_tree(reader, staging.path()).map_err(|e| {
            warn!(backup = %from.display(), error = %e, "backup archive could not be unpacked");
            fs_err(staging.path())(e)
        })?;

        if to.symlink_metadata().is_ok() {
            return Err(LibraryError::DestinationExists(to.to_path_buf()));
        }
        fs::rename(staging.path(), to).map_err(fs_err(to))?;

        info!(backup = %from.display(), destination = %to.display(), "library restored");
        Ok(())
    }
}

/// Canonical form of `path`, which need not exist yet: the longest existing
/// ancestor is canonicalized and the missing components appended.
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(base) => return Ok(missing.iter().rev().fold(base, |acc, part| acc.join(part))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let name = existing.file_name().ok_or(e)?;
                missing.push(name.to_os_string());
                existing = parent_dir(existing);
            }
            Err(e) => return Err(e),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::PathBundle;
    use crate::config::LibraryConfig;
    use museum_crypto::HEADER_SIZE;
    use museum_index::Wing;
    use museum_types::{ErrorKind, StableId};
    use std::collections::BTreeMap;
    use walkdir::WalkDir;

    fn id(s: &str) -> StableId {
        StableId::new(s).unwrap()
    }

    /// Relative path -> file contents (`None` for directories).
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|e| {
                let e = e.unwrap();
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                let contents = e.file_type().is_file().then(|| fs::read(e.path()).unwrap());
                (rel, contents)
            })
            .collect()
    }

    fn populated_library(root: &Path, scratch: &Path) -> MuseumLibrary {
        let lib = MuseumLibrary::create_new(
            root,
            vec![Wing::new(id("fitness"), "Fitness"), Wing::new(id("singers"), "Singers")],
            LibraryConfig::default(),
        )
        .unwrap();
        let blob = scratch.join("blob.bin");
        fs::write(&blob, b"ten bytes!").unwrap();
        lib.ingest(&blob).unwrap();

        let bundle = scratch.join("aria.exhibit");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("manifest.json"), b"{}").unwrap();
        lib.install(&PathBundle::new(&bundle), &id("singers")).unwrap();
        lib
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".museum-"))
            .collect()
    }

    #[test]
    fn backup_then_restore_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("museum");
        let lib = populated_library(&root, dir.path());
        let key = BackupKey::generate();

        let backup = dir.path().join("out/museum.bak");
        lib.backup(&backup, &key).unwrap();
        assert!(backup.is_file());

        let restored = dir.path().join("restored");
        MuseumLibrary::restore(&backup, &key, &restored).unwrap();
        assert_eq!(snapshot(&root), snapshot(&restored));
        assert!(leftovers(dir.path()).is_empty());

        let reopened = MuseumLibrary::open(&restored, LibraryConfig::default()).unwrap();
        assert_eq!(reopened.wings().unwrap().len(), 2);
        assert_eq!(reopened.list_exhibits(&id("singers")).unwrap().len(), 1);
    }

    #[test]
    fn backup_of_fresh_library_restores() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("empty");
        let lib = MuseumLibrary::create_new(&root, vec![], LibraryConfig::default()).unwrap();
        let key = BackupKey::generate();
        let backup = dir.path().join("empty.bak");
        lib.backup(&backup, &key).unwrap();

        let restored = dir.path().join("restored");
        MuseumLibrary::restore(&backup, &key, &restored).unwrap();
        assert_eq!(snapshot(&root), snapshot(&restored));
    }

    #[test]
    fn repeated_backups_differ_but_both_restore() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let key = BackupKey::generate();
        let a = dir.path().join("a.bak");
        let b = dir.path().join("b.bak");
        lib.backup(&a, &key).unwrap();
        lib.backup(&b, &key).unwrap();
        assert_ne!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

        MuseumLibrary::restore(&a, &key, &dir.path().join("ra")).unwrap();
        MuseumLibrary::restore(&b, &key, &dir.path().join("rb")).unwrap();
        assert_eq!(snapshot(&dir.path().join("ra")), snapshot(&dir.path().join("rb")));
    }

    #[test]
    fn backup_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let key = BackupKey::generate();
        let backup = dir.path().join("museum.bak");
        fs::write(&backup, b"stale").unwrap();
        lib.backup(&backup, &key).unwrap();
        MuseumLibrary::restore(&backup, &key, &dir.path().join("restored")).unwrap();
    }

    #[test]
    fn backup_inside_library_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("museum");
        let lib = populated_library(&root, dir.path());
        let key = BackupKey::generate();
        let before = snapshot(&root);

        for destination in [root.join("museum.bak"), root.join("nested/deeper/museum.bak")] {
            let err = lib.backup(&destination, &key).unwrap_err();
            assert!(matches!(err, LibraryError::BackupInsideLibrary(_)));
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        // Also through a relative spelling that climbs out and back in.
        let sneaky = root.join("Wings/../museum.bak");
        assert!(lib.backup(&sneaky, &key).is_err());
        assert_eq!(snapshot(&root), before);
    }

    #[test]
    fn backup_beside_library_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("museum");
        let lib = populated_library(&root, dir.path());
        // Shares the root's name as a prefix but is a sibling directory.
        let backup = dir.path().join("museum-backups/museum.bak");
        lib.backup(&backup, &BackupKey::generate()).unwrap();
        assert!(backup.is_file());
    }

    #[test]
    fn wrong_key_fails_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let backup = dir.path().join("museum.bak");
        lib.backup(&backup, &BackupKey::generate()).unwrap();

        let restored = dir.path().join("restored");
        let err = MuseumLibrary::restore(&backup, &BackupKey::generate(), &restored).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
        assert!(!restored.exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn tampered_backup_fails_authentication() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let key = BackupKey::generate();
        let backup = dir.path().join("museum.bak");
        lib.backup(&backup, &key).unwrap();

        let mut bytes = fs::read(&backup).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        fs::write(&backup, &bytes).unwrap();

        let restored = dir.path().join("restored");
        let err = MuseumLibrary::restore(&backup, &key, &restored).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
        assert!(!restored.exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn undecodable_archive_leaves_no_plaintext_behind() {
        let dir = tempfile::tempdir().unwrap();
        let key = BackupKey::generate();
        let backup = dir.path().join("x.bak");
        // Authenticates under the key but is not a tar stream.
        fs::write(&backup, seal(&key, &[0x5a; 2048]).unwrap()).unwrap();

        let restored = dir.path().join("restored");
        let err = MuseumLibrary::restore(&backup, &key, &restored).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!restored.exists());
        assert!(leftovers(dir.path()).is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn foreign_file_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("notes.txt");
        fs::write(&backup, b"this is not a museum backup at all").unwrap();
        let err = MuseumLibrary::restore(&backup, &BackupKey::generate(), &dir.path().join("r"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn unsupported_version_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let key = BackupKey::generate();
        let backup = dir.path().join("museum.bak");
        lib.backup(&backup, &key).unwrap();

        let mut bytes = fs::read(&backup).unwrap();
        assert!(bytes.len() > HEADER_SIZE);
        bytes[8] = 9;
        fs::write(&backup, &bytes).unwrap();
        let err = MuseumLibrary::restore(&backup, &key, &dir.path().join("r")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn existing_destination_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let lib = populated_library(&dir.path().join("museum"), dir.path());
        let key = BackupKey::generate();
        let backup = dir.path().join("museum.bak");
        lib.backup(&backup, &key).unwrap();

        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        let err = MuseumLibrary::restore(&backup, &key, &target).unwrap_err();
        assert!(matches!(err, LibraryError::DestinationExists(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn missing_backup_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = MuseumLibrary::restore(
            &dir.path().join("absent.bak"),
            &BackupKey::generate(),
            &dir.path().join("r"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
