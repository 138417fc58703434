use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::utils::{EntryMode, ObjectId, ObjectKind, ObjectStore, Tree, TreeEntry};

/// What to do with entries that are neither regular files nor directories
/// (symlinks, sockets, fifos, devices).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecialFiles {
    #[default]
    Skip,
    Fail,
}

/// Turns a directory into a tree object, storing every blob and subtree.
pub struct TreeBuilder<'a> {
    store: &'a ObjectStore,
    excluded: Vec<PathBuf>,
    special_files: SpecialFiles,
}

impl<'a> TreeBuilder<'a> {
    /// The store's own objects directory is always excluded.
    pub fn new(store: &'a ObjectStore) -> Self {
        TreeBuilder {
            store,
            excluded: vec![canonical_or_lexical(store.objects_dir())],
            special_files: SpecialFiles::default(),
        }
    }

    /// Never treat `path` (typically the repository directory) as content.
    pub fn exclude(mut self, path: impl AsRef<Path>) -> Self {
        self.excluded.push(canonical_or_lexical(path.as_ref()));
        self
    }

    pub fn special_files(mut self, policy: SpecialFiles) -> Self {
        self.special_files = policy;
        self
    }

    /// Build and store the tree for `dir`, returning its id.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn build(&self, dir: &Path) -> Result<ObjectId> {
        let root = fs::canonicalize(dir).map_err(|e| Error::traversal(dir, e))?;
        self.build_recursive(&root)
    }

    fn build_recursive(&self, dir: &Path) -> Result<ObjectId> {
        let mut entries = Vec::new();

        for dir_entry in fs::read_dir(dir).map_err(|e| Error::traversal(dir, e))? {
            let dir_entry = dir_entry.map_err(|e| Error::traversal(dir, e))?;
            let path = dir_entry.path();

            if self.excluded.iter().any(|excluded| *excluded == path) {
                continue;
            }

            // DirEntry::file_type does not follow symlinks
            let file_type = dir_entry
                .file_type()
                .map_err(|e| Error::traversal(&path, e))?;
            let name = name_bytes(&dir_entry.file_name());

            if file_type.is_file() {
                let content = fs::read(&path).map_err(|e| Error::traversal(&path, e))?;
                let id = self.store.put(ObjectKind::Blob, &content)?;
                entries.push(TreeEntry::new(EntryMode::File, name, id));
            } else if file_type.is_dir() {
                let id = self.build_recursive(&path)?;
                entries.push(TreeEntry::new(EntryMode::Directory, name, id));
            } else {
                match self.special_files {
                    SpecialFiles::Skip => {
                        warn!(path = %path.display(), "skipping entry that is not a regular file or directory")
                    }
                    SpecialFiles::Fail => {
                        return Err(Error::traversal(
                            &path,
                            io::Error::new(
                                io::ErrorKind::Unsupported,
                                "not a regular file or directory",
                            ),
                        ));
                    }
                }
            }
        }

        let tree = Tree::new(entries);
        let id = self.store.put(ObjectKind::Tree, &tree.to_bytes())?;
        debug!(dir = %dir.display(), %id, entries = tree.entries().len(), "tree stored");
        Ok(id)
    }
}

// The excluded path may not exist yet; resolve its parent instead.
fn canonical_or_lexical(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}
