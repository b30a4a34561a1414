//! Clap argument definitions for the `tunesift` CLI.

use std::{env, path::PathBuf, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "tunesift")]
#[command(about = "Filter a music library with tag, regex and numeric queries")]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `tunesift search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query to filter the library with
    pub query: String,

    /// Library JSON file [default: library.path from the configuration]
    #[arg(short = 'l', long)]
    pub library: Option<PathBuf>,

    /// Maximum songs to print [default: 50]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Stop scanning once LIMIT songs matched, leaving the total uncounted
    #[arg(long)]
    pub first: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Tags to show, comma separated [default: artist,album,title,~#length]
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

/// Arguments for `tunesift check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Queries to check
    #[arg(required = true)]
    pub queries: Vec<String>,
}

/// Arguments for `tunesift explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    /// Query to compile
    pub query: String,
}

/// Arguments for `tunesift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.tunesift.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `tunesift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the songs a query matches
    #[command(after_help = "\
QUERY SYNTAX:
  beatles help           Plain words, each found in artist, album or title
  artist = beatles       Tag contains the word (case-insensitive)
  artist != beatles      Tag does not contain the word
  title = \"Help!\"        Tag is exactly the quoted text
  album = /^abbey/c      Regular expression (c: case-sensitive, d: fold accents)
  artist, performer = x  Any of several tags
  &(a, b)  |(a, b)  !a   All of, any of, not
  #(length > 3:30)       Numeric comparison
  #(2 days < added)      Ages: now, today, N seconds..years
  #(added > 2020-01-01)  Timestamps also take dates (UTC midnight)
  #(date >= 1969-09)     Dates compare as YYYYMMDD

EXAMPLES:
  tunesift search 'abbey road'
  tunesift search 'artist = |(beatles, stones)'
  tunesift search '&(genre = jazz, #(rating > 0.8))'
  tunesift search '!(artist = /beatles/)' --json")]
    Search(SearchCommand),

    /// Classify queries as valid, plain text or invalid
    Check(CheckCommand),

    /// Show the matcher tree a query compiles to
    Explain(ExplainCommand),

    /// Initialize tunesift configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments, printing compact help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_command_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints the about line and one line per subcommand.
fn print_command_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: tunesift [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log more (-v info, -vv debug, -vvv trace)");
    println!("  -q, --quiet       Only log warnings and errors");
    println!("  -h, --help        Print help");
}

#[cfg(test)]
mod tests {
    use tunesift_config::Config;

    use super::*;

    /// Gets help text for a subcommand's argument.
    fn get_arg_help(cmd: &clap::Command, subcmd: &str, arg: &str) -> String {
        cmd.get_subcommands()
            .find(|c| c.get_name() == subcmd)
            .and_then(|c| c.get_arguments().find(|a| a.get_id() == arg))
            .and_then(|a| a.get_help().map(|h| h.to_string()))
            .unwrap_or_default()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    /// Catches drift between the configuration defaults and the help text.
    #[test]
    fn help_defaults_match_config() {
        let cmd = Cli::command();
        let defaults = Config::default();

        let limit_help = get_arg_help(&cmd, "search", "limit");
        assert!(
            limit_help.contains(&format!("[default: {}]", defaults.output.limit)),
            "search --limit help should contain default {}: {limit_help}",
            defaults.output.limit
        );

        let columns_help = get_arg_help(&cmd, "search", "columns");
        let columns = defaults.output.columns.join(",");
        assert!(
            columns_help.contains(&format!("[default: {columns}]")),
            "search --columns help should contain default {columns}: {columns_help}"
        );
    }

    #[test]
    fn columns_split_on_commas() {
        let cli = Cli::try_parse_from(["tunesift", "search", "x", "--columns", "title,~#length"])
            .unwrap();
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.columns, ["title", "~#length"]);
        assert!(cmd.limit.is_none());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["tunesift", "check", "-vv", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
