//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use tunesift_library::Song;
use tunesift_query::RecordAccessor;

/// Prefix of numeric pseudo-field columns.
const NUMERIC_PREFIX: &str = "~#";

/// Numeric fields shown as clock durations.
const DURATION_FIELDS: &[&str] = &["length"];

/// JSON output for `tunesift search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The query string as given.
    query: &'a str,
    /// Songs the query matched before the limit was applied; `null` when the scan
    /// stopped at the limit.
    total_matches: Option<usize>,
    /// The songs printed.
    songs: &'a [&'a Song],
}

/// Prints search results as JSON.
pub fn print_json(query: &str, total_matches: Option<usize>, songs: &[&Song]) -> ExitCode {
    let output = JsonSearchOutput {
        query,
        total_matches,
        songs,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints search results as a table, one column per tag.
///
/// `total_matches` is `None` when the scan stopped at the limit.
pub fn print_table(songs: &[&Song], columns: &[String], total_matches: Option<usize>) {
    if songs.is_empty() {
        println!("No songs found.");
        return;
    }

    println!("{}", song_table(songs, columns));
    println!("{}", summary(songs.len(), total_matches));
}

/// The line under the table.
fn summary(shown: usize, total_matches: Option<usize>) -> String {
    match total_matches {
        None => format!("{shown} shown; stopped at the limit"),
        Some(total) if total > shown => format!("{shown} of {total} songs shown"),
        Some(1) => "1 song".to_string(),
        Some(total) => format!("{total} songs"),
    }
}

/// Builds the result table, one row per song.
fn song_table(songs: &[&Song], columns: &[String]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| column_header(c)));

    for &song in songs {
        table.add_row(columns.iter().map(|c| Cell::new(format_column(song, c))));
    }
    table
}

/// The header text for a column: the tag name without any `~#` or `~` prefix.
fn column_header(column: &str) -> String {
    column
        .strip_prefix(NUMERIC_PREFIX)
        .or_else(|| column.strip_prefix('~'))
        .unwrap_or(column)
        .to_string()
}

/// The display text of one column for `song`.
///
/// `~#name` columns read the numeric field; other columns list the tag's values.
pub fn format_column<R: RecordAccessor + ?Sized>(song: &R, column: &str) -> String {
    let Some(name) = column.strip_prefix(NUMERIC_PREFIX) else {
        return song.tag_values(column).join(", ");
    };

    match song.numeric(name) {
        Some(value) if DURATION_FIELDS.contains(&name) => format_duration(value),
        Some(value) => format_number(value),
        None => String::new(),
    }
}

/// Formats seconds as `m:ss`, or `h:mm:ss` from an hour up.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Formats a number without a trailing `.0` for whole values.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song() -> Song {
        let mut song = Song::from_tags([
            ("artist", "Simon & Garfunkel"),
            ("artist", "Paul Simon"),
            ("title", "The Boxer"),
        ]);
        song.set_numeric("length", 308.0);
        song.set_numeric("rating", 0.75);
        song
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.6), "1:00");
        assert_eq!(format_duration(308.0), "5:08");
        assert_eq!(format_duration(3_725.0), "1:02:05");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn columns() {
        let song = song();
        assert_eq!(format_column(&song, "artist"), "Simon & Garfunkel, Paul Simon");
        assert_eq!(format_column(&song, "~#length"), "5:08");
        assert_eq!(format_column(&song, "~#rating"), "0.75");
        assert_eq!(format_column(&song, "~#playcount"), "0");
        assert_eq!(format_column(&song, "album"), "");
        assert_eq!(format_column(&song, "~#bpm"), "");
    }

    #[test]
    fn table_rows_follow_columns() {
        let first = song();
        let second = Song::from_tags([("title", "Mrs. Robinson")]);
        let columns = vec!["title".to_string(), "~#length".to_string()];

        let table = song_table(&[&first, &second], &columns);
        assert_eq!(table.row_count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("length"));
        assert!(rendered.contains("The Boxer"));
        assert!(rendered.contains("5:08"));
        assert!(rendered.contains("Mrs. Robinson"));
    }

    #[test]
    fn summaries() {
        assert_eq!(summary(1, Some(1)), "1 song");
        assert_eq!(summary(3, Some(3)), "3 songs");
        assert_eq!(summary(2, Some(9)), "2 of 9 songs shown");
        assert_eq!(summary(2, None), "2 shown; stopped at the limit");
    }

    #[test]
    fn headers_drop_prefixes() {
        assert_eq!(column_header("~#length"), "length");
        assert_eq!(column_header("~people"), "people");
        assert_eq!(column_header("title"), "title");
    }
}
