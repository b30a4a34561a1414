//! Configuration merging.
//!
//! Folds the parsed files into one [`Config`]. Files arrive closest first; each setting
//! takes the value from the first file that defines it.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, LibrarySettings, OutputSettings, QuerySettings,
    parse::{RawConfig, RawLibrarySettings, RawOutputSettings, RawQuerySettings},
    resolve::resolve_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory holding the config file, against which its paths resolve.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges configuration files, highest precedence first, into a single `Config`.
///
/// Every scalar and list takes the first defined value. `library.path` is resolved
/// relative to the file that set it.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut config = Config {
        config_root: configs.first().map(|c| c.dir().to_path_buf()),
        ..Config::default()
    };

    // Lowest precedence first, so closer files overwrite.
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(query) = &raw.query {
            apply_query(&mut config.query, query);
        }
        if let Some(library) = &raw.library {
            apply_library(&mut config.library, library, parsed.dir())?;
        }
        if let Some(output) = &raw.output {
            apply_output(&mut config.output, output);
        }
    }

    Ok(config)
}

/// Applies `[query]` values that are present.
fn apply_query(result: &mut QuerySettings, raw: &RawQuerySettings) {
    if let Some(fields) = &raw.default_fields {
        result.default_fields.clone_from(fields);
    }
    if let Some(v) = raw.diacritic_folding {
        result.diacritic_folding = v;
    }
    if let Some(v) = raw.max_depth {
        result.max_depth = v;
    }
}

/// Applies `[library]` values that are present.
fn apply_library(
    result: &mut LibrarySettings,
    raw: &RawLibrarySettings,
    config_dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(path) = &raw.path {
        result.path = Some(resolve_path(path, config_dir)?);
    }
    if let Some(v) = raw.chunk_size {
        result.chunk_size = v;
    }
    Ok(())
}

/// Applies `[output]` values that are present.
fn apply_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(columns) = &raw.columns {
        result.columns.clone_from(columns);
    }
}
