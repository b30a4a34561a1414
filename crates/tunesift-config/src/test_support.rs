//! A throwaway music tree for unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// Directories, libraries and `.tunesift.toml` files under a temp root.
pub struct MusicTree {
    /// Removed on drop.
    root: TempDir,
}

impl MusicTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// The tree's root directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel` and its parents; `""` is the root itself.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes an empty song list at `rel`.
    pub fn library(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "[]").unwrap();
        path
    }

    /// Writes `.tunesift.toml` into directory `rel`.
    pub fn config(&self, rel: &str, toml: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, toml).unwrap();
        path
    }
}
