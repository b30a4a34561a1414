//! Implementation of `tunesift config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows where settings were loaded from and their effective values.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &config.config_root {
        Some(root) => println!("# config root: {}", root.display()),
        None => println!("# no configuration files found; showing defaults"),
    }
    print!("{toml}");
    ExitCode::SUCCESS
}
