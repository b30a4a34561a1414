//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use tracing::{debug, warn};
use tunesift_config::Config;
use tunesift_library::Library;
use tunesift_query::{FoldingTable, QueryCompiler};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// Configuration warnings are logged; they never stop a command.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        for warning in config.validate() {
            warn!("{warning}");
        }
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds a query compiler from the `[query]` settings.
    pub fn compiler(&self) -> QueryCompiler {
        let settings = &self.config.query;
        let folding = settings
            .diacritic_folding
            .then(|| Arc::new(FoldingTable::new()));
        QueryCompiler::new()
            .with_default_fields(&settings.default_fields)
            .with_folding(folding)
            .with_max_depth(settings.max_depth)
    }

    /// Loads the library, preferring `explicit` over the configured path.
    ///
    /// A relative `explicit` path is taken from the working directory.
    pub fn library(&self, explicit: Option<&Path>) -> Result<Library, ExitCode> {
        let path = match explicit {
            Some(path) => self.cwd.join(path),
            None => match &self.config.library.path {
                Some(path) => path.clone(),
                None => {
                    eprintln!("error: no library configured");
                    eprintln!(
                        "Pass --library, or set [library] path in .tunesift.toml (see 'tunesift init')."
                    );
                    return Err(ExitCode::FAILURE);
                }
            },
        };

        debug!(path = %path.display(), "loading library");
        Library::load_json(&path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
