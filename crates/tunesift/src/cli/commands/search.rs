//! Implementation of `tunesift search`.

use std::{
    process::ExitCode,
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::info;
use tunesift_library::Song;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{print_json, print_table},
};

/// Filters the library and prints the matching songs.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let query = match ctx.compiler().query(&cmd.query) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let library = match ctx.library(cmd.library.as_deref()) {
        Ok(library) => library,
        Err(code) => return code,
    };

    let limit = cmd.limit.unwrap_or(ctx.config.output.limit);
    let cancel = AtomicBool::new(false);
    let mut shown: Vec<&Song> = Vec::new();
    let stats = library.filter_chunked(
        &query,
        ctx.config.library.chunk_size,
        &cancel,
        |matched| {
            let room = limit.saturating_sub(shown.len());
            shown.extend(matched.iter().copied().take(room));
            if cmd.first && shown.len() >= limit {
                cancel.store(true, Ordering::Relaxed);
            }
        },
    );
    info!(
        songs = stats.scanned,
        matched = stats.matched,
        shown = shown.len(),
        stopped_early = stats.cancelled,
        "search finished"
    );

    // A cancelled scan only counted the chunks it reached.
    let total_matches = (!stats.cancelled).then_some(stats.matched);

    if cmd.json {
        return print_json(&cmd.query, total_matches, &shown);
    }

    let columns: Vec<String> = if cmd.columns.is_empty() {
        ctx.config.output.columns.clone()
    } else {
        cmd.columns.iter().map(|c| c.trim().to_lowercase()).collect()
    };
    print_table(&shown, &columns, total_matches);
    ExitCode::SUCCESS
}
