//! Implementation of `tunesift explain`.

use std::process::ExitCode;

use tunesift_query::{QueryCompiler, Reading};

use crate::cli::{args::ExplainCommand, context::CommandContext};

/// Prints the matcher tree a query compiles to.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let compiler = ctx.compiler();
    match explain(&compiler, &cmd.query) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Renders how `query` is read and the tree it compiles to.
fn explain(compiler: &QueryCompiler, query: &str) -> Result<String, String> {
    let (matcher, reading) = compiler
        .compile_with_reading(query)
        .map_err(|e| e.to_string())?;
    let fields = compiler.default_fields().join(", ");
    let reading = match reading {
        Reading::Everything => "empty, matches every song".to_string(),
        Reading::Values => format!("value set over {fields}"),
        Reading::PlainText => format!("plain text over {fields}"),
        Reading::Full => format!("query, default fields {fields}"),
    };

    let mut out = String::new();
    out.push_str("Query:\n");
    out.push_str(&format!("   {}\n", query.trim()));
    out.push_str(&format!("   ({reading})\n\n"));
    out.push_str("Matcher:\n");
    for line in matcher.to_string().lines() {
        out.push_str(&format!("   {line}\n"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explains_plain_text() {
        let text = explain(&QueryCompiler::new(), "abbey road").unwrap();
        assert!(text.contains("plain text over artist, album, title"));
        assert!(text.contains("Intersection"));
    }

    #[test]
    fn names_each_reading() {
        let compiler = QueryCompiler::new();
        let reading = |query| explain(&compiler, query).unwrap();
        assert!(reading("").contains("(empty, matches every song)"));
        assert!(reading("/beatles/").contains("(value set over artist, album, title)"));
        assert!(reading("artist = beatles").contains("(query, default fields artist"));
    }

    #[test]
    fn explains_numeric() {
        let text = explain(&QueryCompiler::new(), "#(length > 3:00)").unwrap();
        assert!(text.contains("Numeric("));
    }

    #[test]
    fn reports_errors_with_caret() {
        let err = explain(&QueryCompiler::new(), "artist = /abc").unwrap_err();
        assert!(err.contains('^'));
    }
}
