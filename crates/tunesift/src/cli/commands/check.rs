//! Implementation of `tunesift check`.

use std::process::ExitCode;

use tunesift_query::{ColorHint, QueryCompiler};

use crate::cli::{args::CheckCommand, context::CommandContext};

/// Classifies each query; fails if any of them is invalid.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    let compiler = ctx.compiler();
    let mut invalid = 0;

    for query in &cmd.queries {
        let (label, error) = classify(&compiler, query);
        println!("{label:<10} {query}");
        if let Some(error) = error {
            invalid += 1;
            for line in error.lines() {
                println!("           {line}");
            }
        }
    }

    if invalid > 0 {
        eprintln!("error: {invalid} of {} queries are invalid", cmd.queries.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// The label for a query and, when it is invalid, the rendered error.
fn classify(compiler: &QueryCompiler, query: &str) -> (&'static str, Option<String>) {
    match compiler.compile_with_reading(query) {
        Ok((_, reading)) if reading.color_hint() == ColorHint::PlainText => ("plain text", None),
        Ok(_) => ("valid", None),
        Err(e) => ("invalid", Some(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        let compiler = QueryCompiler::new();
        assert_eq!(classify(&compiler, "").0, "valid");
        assert_eq!(classify(&compiler, "artist = beatles").0, "valid");
        assert_eq!(classify(&compiler, "abbey road").0, "plain text");

        let (label, error) = classify(&compiler, "#(length >");
        assert_eq!(label, "invalid");
        assert!(error.unwrap().starts_with("query syntax error"));
    }
}
