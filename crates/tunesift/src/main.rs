//! Entry point for the `tunesift` binary.

use std::{env, io, process::ExitCode};

use tracing_subscriber::EnvFilter;
use tunesift::cli::{
    CommandContext,
    args::{Commands, parse_cli},
    commands,
};

/// Environment variable holding an explicit log filter.
const LOG_ENV: &str = "TUNESIFT_LOG";

/// Installs the stderr log subscriber.
///
/// `TUNESIFT_LOG` takes precedence over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = env::var(LOG_ENV) {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.verbose, cli.quiet);

    // `init` must work even when an existing config file is broken.
    let ctx = if matches!(cli.command, Commands::Init(_)) {
        CommandContext::load_cwd_only()
    } else {
        CommandContext::load()
    };

    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
