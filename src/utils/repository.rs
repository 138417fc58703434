use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};
use crate::utils::{ObjectStore, TreeBuilder};

pub const VIT_DIR_NAME: &str = ".vit";
/// Overrides discovery with an explicit repository directory.
pub const VIT_DIR_ENV: &str = "VIT_DIR";

/// Locations of a repository: its `.vit` directory and the working tree.
#[derive(Debug, Clone)]
pub struct Repository {
    vit_dir: PathBuf,
    work_tree: PathBuf,
}

impl Repository {
    pub fn at(vit_dir: impl Into<PathBuf>) -> Self {
        let vit_dir = vit_dir.into();
        // a bare relative name like ".vit" has an empty parent
        let work_tree = match vit_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Repository { vit_dir, work_tree }
    }

    /// Use `$VIT_DIR` if set, otherwise search `start` and its ancestors.
    pub fn discover(start: &Path) -> Result<Self> {
        Self::discover_with(start, env::var_os(VIT_DIR_ENV).map(PathBuf::from))
    }

    /// Like [`Repository::discover`] with the override passed in. A relative
    /// `explicit` directory is resolved against `start`.
    pub fn discover_with(start: &Path, explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(explicit) => {
                let vit_dir = start.join(explicit);
                if vit_dir.join("objects").is_dir() {
                    Ok(Repository::at(vit_dir))
                } else {
                    Err(Error::NotARepository(vit_dir))
                }
            }
            None => Self::discover_from(start),
        }
    }

    /// Walk upward from `start` looking for a `.vit` directory.
    pub fn discover_from(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            let candidate = dir.join(VIT_DIR_NAME);
            if candidate.join("objects").is_dir() {
                return Ok(Repository::at(candidate));
            }
        }
        Err(Error::NotARepository(start.to_path_buf()))
    }

    /// Create the repository scaffolding under `dir`. Returns `None` when a
    /// repository already exists there.
    pub fn init(dir: &Path) -> Result<Option<Self>> {
        let path_to_vit = dir.join(VIT_DIR_NAME);

        if path_to_vit.exists() {
            return Ok(None);
        }

        for sub in ["objects", "refs/heads"] {
            let path = path_to_vit.join(sub);
            fs::create_dir_all(&path).map_err(|e| Error::storage(&path, e))?;
        }

        let head = path_to_vit.join("HEAD");
        fs::write(&head, "ref: refs/heads/main\n").map_err(|e| Error::storage(&head, e))?;

        Ok(Some(Repository::at(path_to_vit)))
    }

    pub fn vit_dir(&self) -> &Path {
        &self.vit_dir
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn objects(&self) -> ObjectStore {
        ObjectStore::new(self.vit_dir.join("objects"))
    }

    /// Tree builder over the working tree with the `.vit` directory excluded.
    pub fn tree_builder<'a>(&self, store: &'a ObjectStore) -> TreeBuilder<'a> {
        TreeBuilder::new(store).exclude(&self.vit_dir)
    }
}
