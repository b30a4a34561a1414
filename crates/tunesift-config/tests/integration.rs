//! Integration tests for tunesift-config.
//!
//! Exercises the whole loading pipeline: discovery, parsing, path resolution, merging
//! and validation.

#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tunesift_config::{
    CONFIG_FILENAME, Config, ConfigError, ConfigWarning, discover_with_global, local_template,
};

/// A temporary directory tree to load configuration from.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Loads the configuration seen from `rel_path`, ignoring the user's global file.
    fn load(&self, rel_path: &str) -> Result<Config, ConfigError> {
        let cwd = self.create_dir(rel_path);
        Config::load_from_files(&discover_with_global(&cwd, None))
    }
}

#[test]
fn no_config_gives_defaults() {
    let env = TestEnv::new();
    let config = env.load(".").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn single_config() {
    let env = TestEnv::new();
    let library = env.create_file("library.json", "[]");
    env.create_file(
        CONFIG_FILENAME,
        r#"
[library]
path = "library.json"

[output]
limit = 10
"#,
    );

    let config = env.load(".").unwrap();
    assert_eq!(config.library.path, Some(library.canonicalize().unwrap()));
    assert_eq!(config.output.limit, 10);
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
    assert!(config.validate().is_empty());
}

#[test]
fn nested_configs_merge() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        r#"
[query]
default_fields = ["artist", "album", "title", "genre"]
diacritic_folding = false

[output]
limit = 5
"#,
    );
    env.create_file(
        "jazz/.tunesift.toml",
        r#"
[query]
default_fields = "performer"

[output]
columns = ["performer", "title"]
"#,
    );

    let config = env.load("jazz/blue-note").unwrap();
    assert_eq!(config.query.default_fields, ["performer"]);
    assert!(!config.query.diacritic_folding);
    assert_eq!(config.output.limit, 5);
    assert_eq!(config.output.columns, ["performer", "title"]);
    assert_eq!(config.config_root, Some(env.path().join("jazz")));
}

#[test]
fn root_config_hides_parents() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "[output]\nlimit = 1\n");
    env.create_file("project/.tunesift.toml", "root = true\n");

    let config = env.load("project/src").unwrap();
    assert_eq!(config.output.limit, 50);
}

#[test]
fn library_path_from_parent_config() {
    let env = TestEnv::new();
    let library = env.create_file("shared/songs.json", "[]");
    env.create_file(CONFIG_FILENAME, "[library]\npath = \"shared/songs.json\"\n");
    env.create_file("project/.tunesift.toml", "[library]\nchunk_size = 50\n");

    let config = env.load("project").unwrap();
    assert_eq!(config.library.path, Some(library.canonicalize().unwrap()));
    assert_eq!(config.library.chunk_size, 50);
}

#[test]
fn invalid_toml_is_an_error() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "[output\nlimit = 5\n");

    let err = env.load(".").unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn unknown_section_is_an_error() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "[tree.docs]\npath = \"./docs\"\n");

    assert!(matches!(
        env.load(".").unwrap_err(),
        ConfigError::ParseToml { .. }
    ));
}

#[test]
fn validation_warnings() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        r#"
[query]
default_fields = ["title", "a|b"]

[library]
path = "missing.json"
chunk_size = 0
"#,
    );

    let warnings = env.load(".").unwrap().validate();
    assert_eq!(warnings.len(), 3);
    assert!(warnings.contains(&ConfigWarning::InvalidDefaultField {
        field: "a|b".into()
    }));
    assert!(warnings.contains(&ConfigWarning::ZeroChunkSize));
    assert!(
        warnings
            .iter()
            .any(|w| matches!(w, ConfigWarning::LibraryMissing { .. }))
    );
}

#[test]
fn settings_round_trip_through_toml() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        "[query]\nmax_depth = 8\n\n[output]\ncolumns = [\"title\"]\n",
    );
    let config = env.load(".").unwrap();

    env.create_file("copy/.tunesift.toml", &config.settings_to_toml().unwrap());
    let copy = Config::load_from_files(&[env.path().join("copy").join(CONFIG_FILENAME)]).unwrap();

    assert_eq!(copy.query, config.query);
    assert_eq!(copy.output, config.output);
}

#[test]
fn written_template_loads_as_defaults() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, &local_template());
    let config = env.load(".").unwrap();
    assert_eq!(config.query, Config::default().query);
    assert_eq!(config.library, Config::default().library);
}
