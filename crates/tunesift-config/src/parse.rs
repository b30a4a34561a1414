//! Configuration file parsing.
//!
//! Each `.tunesift.toml` is read into a [`RawConfig`] whose fields are all optional, so
//! that a file only overrides what it mentions when files are merged.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// `[query]` section.
    pub query: Option<RawQuerySettings>,
    /// `[library]` section.
    pub library: Option<RawLibrarySettings>,
    /// `[output]` section.
    pub output: Option<RawOutputSettings>,
}

/// Raw `[query]` settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawQuerySettings {
    /// Fields searched by plain text. A single name or a list.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub default_fields: Option<Vec<String>>,
    /// Whether unaccented letters in queries also match accented ones.
    pub diacritic_folding: Option<bool>,
    /// Deepest allowed nesting of groups and negations.
    pub max_depth: Option<usize>,
}

/// Raw `[library]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawLibrarySettings {
    /// Library file, relative to the config file's directory.
    pub path: Option<String>,
    /// Songs scanned between cancellation checks.
    pub chunk_size: Option<usize>,
}

/// Raw `[output]` settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawOutputSettings {
    /// Maximum number of songs printed.
    pub limit: Option<usize>,
    /// Tags shown as table columns. A single name or a list.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub columns: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string. `path` is only used in errors.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Whether the file at `path` sets `root = true`.
///
/// Unreadable or malformed files count as not root; loading reports them later.
pub fn is_root_config(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| toml::from_str::<RawConfig>(&contents).ok())
        .is_some_and(|config| config.root == Some(true))
}
