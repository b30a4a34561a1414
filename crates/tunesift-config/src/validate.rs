//! Configuration validation.
//!
//! Reports settings that load fine but will not behave as intended.

use std::fmt;

use crate::Config;

/// Characters that end a bare word in a query, so cannot appear in a tag name.
const QUERY_SYNTAX: &[char] = &['=', '|', '(', ')', '&', '!', ',', '#', '/', '<', '>', '"', '\''];

/// Deepest nesting the query compiler accepts, whatever `max_depth` says.
pub const MAX_DEPTH_CEILING: usize = 256;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `default_fields` is empty, so plain text matches nothing.
    NoDefaultFields,
    /// A default field is not something a query could name.
    InvalidDefaultField {
        /// The offending field.
        field: String,
    },
    /// The library file does not exist.
    LibraryMissing {
        /// The configured path.
        path: String,
    },
    /// The library path exists but is not a file.
    LibraryNotAFile {
        /// The configured path.
        path: String,
    },
    /// `chunk_size` is zero; one song per chunk is used instead.
    ZeroChunkSize,
    /// `max_depth` exceeds what the compiler accepts and will be capped.
    MaxDepthTooLarge {
        /// The configured depth.
        max_depth: usize,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultFields => {
                write!(f, "query.default_fields is empty; plain-text searches match nothing")
            }
            Self::InvalidDefaultField { field } => {
                write!(f, "default field '{field}' is not a valid tag name")
            }
            Self::LibraryMissing { path } => write!(f, "library file does not exist: {path}"),
            Self::LibraryNotAFile { path } => write!(f, "library path is not a file: {path}"),
            Self::ZeroChunkSize => write!(f, "library.chunk_size is 0; using 1"),
            Self::MaxDepthTooLarge { max_depth } => write!(
                f,
                "query.max_depth is {max_depth}; using {MAX_DEPTH_CEILING}"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.query.default_fields.is_empty() {
        warnings.push(ConfigWarning::NoDefaultFields);
    }
    warnings.extend(
        config
            .query
            .default_fields
            .iter()
            .filter(|field| !is_tag_name(field))
            .map(|field| ConfigWarning::InvalidDefaultField {
                field: field.clone(),
            }),
    );

    if let Some(path) = &config.library.path {
        let shown = path.display().to_string();
        if !path.exists() {
            warnings.push(ConfigWarning::LibraryMissing { path: shown });
        } else if !path.is_file() {
            warnings.push(ConfigWarning::LibraryNotAFile { path: shown });
        }
    }

    if config.library.chunk_size == 0 {
        warnings.push(ConfigWarning::ZeroChunkSize);
    }

    if config.query.max_depth > MAX_DEPTH_CEILING {
        warnings.push(ConfigWarning::MaxDepthTooLarge {
            max_depth: config.query.max_depth,
        });
    }

    warnings
}

/// Whether `name` could be written as a tag in a query.
fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !QUERY_SYNTAX.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MusicTree;

    #[test]
    fn defaults_are_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn empty_default_fields() {
        let mut config = Config::default();
        config.query.default_fields.clear();
        assert_eq!(validate_config(&config), vec![ConfigWarning::NoDefaultFields]);
    }

    #[test]
    fn bad_default_fields() {
        let mut config = Config::default();
        config.query.default_fields = vec![
            "~people".into(),
            "album artist".into(),
            "künstler".into(),
            "a=b".into(),
            String::new(),
        ];
        let bad: Vec<_> = validate_config(&config)
            .into_iter()
            .filter_map(|w| match w {
                ConfigWarning::InvalidDefaultField { field } => Some(field),
                _ => None,
            })
            .collect();
        assert_eq!(bad, ["album artist", "künstler", "a=b", ""]);
    }

    #[test]
    fn library_path_checks() {
        let tree = MusicTree::new();
        let mut config = Config::default();

        config.library.path = Some(tree.path().join("missing.json"));
        assert!(matches!(
            validate_config(&config).as_slice(),
            [ConfigWarning::LibraryMissing { .. }]
        ));

        config.library.path = Some(tree.dir("music"));
        assert!(matches!(
            validate_config(&config).as_slice(),
            [ConfigWarning::LibraryNotAFile { .. }]
        ));

        config.library.path = Some(tree.library("library.json"));
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn zero_chunk_size() {
        let mut config = Config::default();
        config.library.chunk_size = 0;
        let warnings = validate_config(&config);
        assert_eq!(warnings, vec![ConfigWarning::ZeroChunkSize]);
        assert_eq!(warnings[0].to_string(), "library.chunk_size is 0; using 1");
    }

    #[test]
    fn oversized_max_depth() {
        let mut config = Config::default();
        config.query.max_depth = MAX_DEPTH_CEILING;
        assert!(validate_config(&config).is_empty());

        config.query.max_depth = 1_000_000;
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::MaxDepthTooLarge { max_depth: 1_000_000 }]
        );
        assert_eq!(warnings[0].to_string(), "query.max_depth is 1000000; using 256");
    }
}
