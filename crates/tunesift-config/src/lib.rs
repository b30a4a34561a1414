//! Configuration system for tunesift.
//!
//! tunesift reads TOML files named `.tunesift.toml`. Files are collected by walking up
//! from the current working directory, then `~/.tunesift.toml` is added with the lowest
//! precedence. A file with `root = true` ends the walk and excludes the global file.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, discover_config_files, discover_with_global, global_config_path,
    is_global_config,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawLibrarySettings, RawOutputSettings, RawQuerySettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
pub use templates::{global_template, local_template};
pub use validate::{ConfigWarning, MAX_DEPTH_CEILING};
use validate::validate_config;

/// Fields searched by plain-text queries unless configured otherwise.
const DEFAULT_FIELDS: &[&str] = &["artist", "album", "title"];

/// Columns printed for search results unless configured otherwise.
const DEFAULT_COLUMNS: &[&str] = &["artist", "album", "title", "~#length"];

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Query compilation settings.
    pub query: QuerySettings,
    /// Library location and scanning.
    pub library: LibrarySettings,
    /// Result display.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Discovers and merges every config file that applies in `cwd`.
    ///
    /// Returns the defaults if no file is found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads and merges the given files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Checks the configuration for problems that do not prevent loading it.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Renders the effective settings in `.tunesift.toml` syntax.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let view = SettingsView {
            query: &self.query,
            library: &self.library,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&view)?)
    }
}

/// `[query]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySettings {
    /// Fields searched by plain text and bare value sets.
    pub default_fields: Vec<String>,
    /// Whether unaccented letters also match accented ones.
    pub diacritic_folding: bool,
    /// Deepest allowed nesting of groups and negations.
    pub max_depth: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            diacritic_folding: true,
            max_depth: 64,
        }
    }
}

/// `[library]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySettings {
    /// Resolved path of the library JSON file, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Songs scanned between cancellation checks.
    pub chunk_size: usize,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            path: None,
            chunk_size: 1000,
        }
    }
}

/// `[output]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSettings {
    /// Maximum number of songs printed.
    pub limit: usize,
    /// Tags shown as table columns.
    pub columns: Vec<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            columns: DEFAULT_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Borrowed view of the settings sections, in file order.
#[derive(Serialize)]
struct SettingsView<'a> {
    /// Query settings.
    query: &'a QuerySettings,
    /// Library settings.
    library: &'a LibrarySettings,
    /// Output settings.
    output: &'a OutputSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.query.default_fields, ["artist", "album", "title"]);
        assert!(config.query.diacritic_folding);
        assert_eq!(config.query.max_depth, 64);
        assert!(config.library.path.is_none());
        assert_eq!(config.library.chunk_size, 1000);
        assert_eq!(config.output.limit, 50);
        assert_eq!(config.output.columns.len(), 4);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn settings_render_as_toml() {
        let mut config = Config::default();
        config.library.path = Some(PathBuf::from("/music/library.json"));
        let rendered = config.settings_to_toml().unwrap();

        assert!(rendered.contains("[query]"));
        assert!(rendered.contains("[library]"));
        assert!(rendered.contains("[output]"));
        assert!(rendered.contains("diacritic_folding = true"));
        assert!(rendered.contains("path = \"/music/library.json\""));

        let reparsed = parse::parse_config(&rendered).unwrap();
        assert_eq!(reparsed.output.unwrap().limit, Some(50));
        assert_eq!(
            reparsed.query.unwrap().default_fields,
            Some(config.query.default_fields)
        );
    }

    #[test]
    fn unset_library_path_is_omitted() {
        let rendered = Config::default().settings_to_toml().unwrap();
        assert!(!rendered.contains("path ="));
    }
}
