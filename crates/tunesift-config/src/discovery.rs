//! Configuration file discovery.
//!
//! Finds `.tunesift.toml` files in the working directory and its ancestors, then
//! adds the per-user `~/.tunesift.toml` unless a project file declared itself the root.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".tunesift.toml";

/// Discovers the configuration files that apply in `cwd`.
///
/// Paths come back closest first, so earlier files take precedence when merged:
/// 1. every `.tunesift.toml` from `cwd` up to the filesystem root,
/// 2. stopping after a file that sets `root = true`,
/// 3. then `~/.tunesift.toml`, unless discovery stopped at a root file.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    discover_with_global(cwd, global_config_path().as_deref())
}

/// Discovery with an explicit global config location.
pub fn discover_with_global(cwd: &Path, global: Option<&Path>) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = global
        && global.is_file()
        && !configs.iter().any(|c| c == global)
    {
        configs.push(global.to_path_buf());
    }

    configs
}

/// The per-user configuration file, `~/.tunesift.toml`.
///
/// `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Whether `path` is the per-user configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
