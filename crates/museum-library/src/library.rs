use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use museum_index::{manifest_path, read_index, write_index, IndexError, LibraryIndex, Wing};
use museum_store::{ContentStore, FsContentStore};
use museum_types::{ContentReference, StableId};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::bundle::Bundle;
use crate::config::LibraryConfig;
use crate::error::{fs_err, LibraryError, LibraryResult};
use crate::layout::{exhibits_dir, wings_dir};
use crate::lock::{open_lock_file, LibraryLock};

/// A library instance rooted at a directory.
///
/// The handle itself holds no cached manifest: every structural query reads
/// `museum.json` afresh, so several handles (or processes) see each other's
/// committed changes.
#[derive(Clone, Debug)]
pub struct MuseumLibrary {
    root: PathBuf,
    config: LibraryConfig,
    objects: FsContentStore,
}

impl MuseumLibrary {
    /// Create a new library at `root` with the given initial wings.
    ///
    /// Creates the root, `Wings/`, `Wings/<id>/Exhibits/` for each wing, the
    /// lock file, and finally the manifest. A failure part-way leaves
    /// whatever was created in place; retry into a fresh path.
    pub fn create_new(root: &Path, wings: Vec<Wing>, config: LibraryConfig) -> LibraryResult<Self> {
        config.validate().map_err(|reason| LibraryError::Config {
            path: root.to_path_buf(),
            reason,
        })?;
        let index = LibraryIndex::new(wings);
        index.validate()?;
        if manifest_path(root).exists() {
            return Err(LibraryError::AlreadyInitialized(root.to_path_buf()));
        }

        fs::create_dir_all(root).map_err(fs_err(root))?;
        let wings_root = wings_dir(root);
        fs::create_dir_all(&wings_root).map_err(fs_err(&wings_root))?;
        for wing in &index.wings {
            let exhibits = exhibits_dir(root, &wing.id);
            fs::create_dir_all(&exhibits).map_err(fs_err(&exhibits))?;
        }
        open_lock_file(root)?;
        write_index(root, &index)?;

        info!(root = %root.display(), wings = index.len(), "library created");
        Ok(Self::from_parts(root, config))
    }

    /// Open an existing library, checking that its manifest is readable.
    pub fn open(root: &Path, config: LibraryConfig) -> LibraryResult<Self> {
        config.validate().map_err(|reason| LibraryError::Config {
            path: root.to_path_buf(),
            reason,
        })?;
        let index = read_index(root)?;
        debug!(root = %root.display(), wings = index.len(), "library opened");
        Ok(Self::from_parts(root, config))
    }

    fn from_parts(root: &Path, config: LibraryConfig) -> Self {
        let objects = FsContentStore::with_objects_dir(root, config.objects_directory_name.clone());
        Self {
            root: root.to_path_buf(),
            config,
            objects,
        }
    }

    // ---- Accessors ----

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// The library's content-addressed object store.
    pub fn objects(&self) -> &FsContentStore {
        &self.objects
    }

    /// Directory holding installed bundles for `wing`.
    pub fn exhibits_dir(&self, wing: &StableId) -> PathBuf {
        exhibits_dir(&self.root, wing)
    }

    // ---- Index operations ----

    /// Read the current manifest.
    pub fn index(&self) -> LibraryResult<LibraryIndex> {
        Ok(read_index(&self.root)?)
    }

    /// Wings in manifest order.
    pub fn wings(&self) -> LibraryResult<Vec<Wing>> {
        Ok(self.index()?.wings)
    }

    /// Add a wing: create its directories, then append it to the manifest.
    ///
    /// Runs under the exclusive library lock. A crash between the two steps
    /// leaves an unlisted wing directory, which a retry adopts.
    pub fn add_wing(&self, wing: Wing) -> LibraryResult<()> {
        let _lock = LibraryLock::exclusive(&self.root)?;
        let mut index = read_index(&self.root)?;
        if index.contains(&wing.id) {
            return Err(IndexError::DuplicateWing(wing.id).into());
        }

        let exhibits = self.exhibits_dir(&wing.id);
        fs::create_dir_all(&exhibits).map_err(fs_err(&exhibits))?;

        let id = wing.id.clone();
        index.add_wing(wing)?;
        write_index(&self.root, &index)?;
        info!(wing = %id, "wing added");
        Ok(())
    }

    // ---- Content operations ----

    /// Hash a file and store it in the library's object store.
    pub fn ingest(&self, path: &Path) -> LibraryResult<ContentReference> {
        let reference = self.objects.ingest(path)?;
        info!(
            path = %path.display(),
            digest = %reference.short_digest(),
            size = reference.size_bytes,
            "ingested"
        );
        Ok(reference)
    }

    // ---- Exhibit operations ----

    /// Copy `bundle` into `wing`'s Exhibits directory under its own name.
    ///
    /// The copy is assembled in a hidden staging directory beside the target
    /// and renamed into place, so a partial copy is never listed. Fails if
    /// an item with that name is already installed.
    pub fn install(&self, bundle: &dyn Bundle, wing: &StableId) -> LibraryResult<PathBuf> {
        let index = read_index(&self.root)?;
        if !index.contains(wing) {
            return Err(IndexError::UnknownWing(wing.clone()).into());
        }

        let source = bundle.location();
        let name = bundle.name().ok_or_else(|| LibraryError::InvalidBundle {
            path: source.to_path_buf(),
            reason: "bundle path has no final component".into(),
        })?;

        let exhibits = self.exhibits_dir(wing);
        let destination = exhibits.join(name);
        if destination.symlink_metadata().is_ok() {
            return Err(LibraryError::AlreadyInstalled(destination));
        }
        fs::create_dir_all(&exhibits).map_err(fs_err(&exhibits))?;

        let staging = tempfile::Builder::new()
            .prefix(".install-")
            .tempdir_in(&exhibits)
            .map_err(fs_err(&exhibits))?;
        let staged = staging.path().join(name);
        copy_bundle(source, &staged)?;

        move_into_place(&staged, &destination)?;

        info!(wing = %wing, destination = %destination.display(), "bundle installed");
        Ok(destination)
    }

    /// Installed bundles of `wing`, sorted by file name.
    ///
    /// Only entries carrying the configured bundle extension are listed. A
    /// wing without an Exhibits directory has no exhibits.
    pub fn list_exhibits(&self, wing: &StableId) -> LibraryResult<Vec<PathBuf>> {
        let exhibits = self.exhibits_dir(wing);
        let entries = match fs::read_dir(&exhibits) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fs_err(&exhibits)(e)),
        };

        let mut found = Vec::new();
        for entry in entries {
            let path = entry.map_err(fs_err(&exhibits))?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.config.bundle_extension.as_str());
            if matches {
                found.push(path);
            }
        }
        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(found)
    }
}

/// Move a staged bundle to `destination`, never replacing an existing entry.
///
/// Files and symlinks are hard-linked, which fails if the name is taken; the
/// staged copy goes away with its staging directory. Directories claim the
/// name with `create_dir` and are then renamed over that empty claim.
fn move_into_place(staged: &Path, destination: &Path) -> LibraryResult<()> {
    let taken = |e: io::Error| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            LibraryError::AlreadyInstalled(destination.to_path_buf())
        } else {
            fs_err(destination)(e)
        }
    };

    let meta = staged.symlink_metadata().map_err(fs_err(staged))?;
    if meta.is_dir() {
        claim_dir(destination).map_err(taken)?;
        return fs::rename(staged, destination).map_err(|e| {
            let _ = fs::remove_dir(destination);
            fs_err(destination)(e)
        });
    }
    match fs::hard_link(staged, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {
            if destination.symlink_metadata().is_ok() {
                return Err(LibraryError::AlreadyInstalled(destination.to_path_buf()));
            }
            fs::rename(staged, destination).map_err(fs_err(destination))
        }
        Err(e) => Err(taken(e)),
    }
}

#[cfg(unix)]
fn claim_dir(destination: &Path) -> io::Result<()> {
    fs::create_dir(destination)
}

// Elsewhere rename cannot replace an empty directory, so only check.
#[cfg(not(unix))]
fn claim_dir(destination: &Path) -> io::Result<()> {
    if destination.symlink_metadata().is_ok() {
        return Err(io::Error::from(io::ErrorKind::AlreadyExists));
    }
    Ok(())
}

/// Copy a bundle (file, directory tree, or symlink) to `dest`.
fn copy_bundle(source: &Path, dest: &Path) -> LibraryResult<()> {
    let meta = source.symlink_metadata().map_err(fs_err(source))?;
    if !meta.is_dir() {
        return copy_entry(source, dest, &meta);
    }

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| LibraryError::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| LibraryError::Io(io::Error::other(e)))?;
        let target = dest.join(relative);
        let meta = entry.metadata().map_err(|e| LibraryError::Io(e.into()))?;
        if meta.is_dir() {
            fs::create_dir_all(&target).map_err(fs_err(&target))?;
        } else {
            copy_entry(entry.path(), &target, &meta)?;
        }
    }
    Ok(())
}

fn copy_entry(source: &Path, dest: &Path, meta: &fs::Metadata) -> LibraryResult<()> {
    if meta.file_type().is_symlink() {
        let target = fs::read_link(source).map_err(fs_err(source))?;
        return symlink(&target, dest);
    }
    fs::copy(source, dest).map_err(fs_err(source))?;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> LibraryResult<()> {
    std::os::unix::fs::symlink(target, link).map_err(fs_err(link))
}

#[cfg(not(unix))]
fn symlink(_target: &Path, link: &Path) -> LibraryResult<()> {
    Err(LibraryError::InvalidBundle {
        path: link.to_path_buf(),
        reason: "bundles containing symlinks are only supported on unix".into(),
    })
}
