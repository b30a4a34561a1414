//! Compiling query strings into matchers.
//!
//! [`QueryCompiler`] decides how a string is read before handing it to the parser:
//!
//! 1. An empty string matches everything.
//! 2. A bare value set (`&(help, beatles)`, `/^a/`, `!"live"`) searches the default
//!    fields.
//! 3. Text with neither `#` nor `=` is plain text: each word must occur in one of the
//!    default fields.
//! 4. Anything else goes through the full grammar.

use std::{
    fmt,
    str::FromStr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{debug, trace};

use crate::{
    ast::{Matcher, TagMatch, ValueMatcher},
    error::{QueryError, RegexError},
    fold::FoldingTable,
    parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING, ParseOptions, parse, parse_values},
    pattern::Pattern,
    record::RecordAccessor,
};

/// Fields searched when a query names none.
pub const DEFAULT_FIELDS: &[&str] = &["artist", "album", "title"];

/// How a search entry should be tinted for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorHint {
    /// Empty or a well-formed query.
    Valid,
    /// Plain text, searched word by word in the default fields.
    PlainText,
    /// A query that does not compile.
    Invalid,
}

/// The reading a query string was compiled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Empty input.
    Everything,
    /// A bare value set over the default fields.
    Values,
    /// Whitespace-separated words over the default fields.
    PlainText,
    /// The full grammar.
    Full,
}

impl Reading {
    /// The display hint for a query that compiled under this reading.
    pub fn color_hint(self) -> ColorHint {
        match self {
            Self::PlainText => ColorHint::PlainText,
            Self::Everything | Self::Values | Self::Full => ColorHint::Valid,
        }
    }
}

/// Compiles query strings with a fixed set of options.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    /// Fields searched by plain text and bare value sets.
    default_fields: Vec<String>,
    /// Folding table; when set, every pattern is folded.
    folding: Option<Arc<FoldingTable>>,
    /// Nesting limit for the parser.
    max_depth: usize,
    /// Fixed "now" for relative times; the system clock when unset.
    now: Option<f64>,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler {
    /// A compiler searching [`DEFAULT_FIELDS`] with folding off.
    pub fn new() -> Self {
        Self {
            default_fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            folding: None,
            max_depth: DEFAULT_MAX_DEPTH,
            now: None,
        }
    }

    /// Sets the fields searched when a query names none.
    pub fn with_default_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.default_fields = fields
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    /// Turns diacritic folding on (with the given table) or off.
    pub fn with_folding(mut self, table: Option<Arc<FoldingTable>>) -> Self {
        self.folding = table;
        self
    }

    /// Sets the maximum nesting depth, capped at [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    /// Pins the current time used for relative ages (Unix seconds).
    pub fn with_now(mut self, now: f64) -> Self {
        self.now = Some(now);
        self
    }

    /// The fields searched when a query names none.
    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    /// Whether patterns are folded by default.
    pub fn folds(&self) -> bool {
        self.folding.is_some()
    }

    /// Compiles a query string into a matcher.
    pub fn compile(&self, query: &str) -> Result<Matcher, QueryError> {
        self.compile_with_reading(query).map(|(matcher, _)| matcher)
    }

    /// Compiles a query string into a [`Query`].
    pub fn query(&self, text: &str) -> Result<Query, QueryError> {
        Ok(Query {
            text: text.trim().to_string(),
            matcher: self.compile(text)?,
        })
    }

    /// Whether the query compiles. Never fails.
    pub fn is_valid(&self, query: &str) -> bool {
        self.compile(query).is_ok()
    }

    /// Whether the query can be used at all. Text without `#` or `=` always can, as
    /// plain text, and is not parsed.
    pub fn is_parsable(&self, query: &str) -> bool {
        !has_syntax(query) || self.is_valid(query)
    }

    /// Classifies a query for display.
    pub fn color_hint(&self, query: &str) -> ColorHint {
        self.compile_with_reading(query)
            .map_or(ColorHint::Invalid, |(_, reading)| reading.color_hint())
    }

    /// Compiles and reports which reading was used, for callers that need both.
    pub fn compile_with_reading(&self, query: &str) -> Result<(Matcher, Reading), QueryError> {
        let text = query.trim();
        if text.is_empty() {
            debug!("empty query matches everything");
            return Ok((Matcher::everything(), Reading::Everything));
        }

        let options = ParseOptions {
            folding_table: self.folding.as_deref(),
            fold_by_default: self.folding.is_some(),
            max_depth: self.max_depth,
            now: self.now.unwrap_or_else(unix_now),
        };

        match parse_values(text, &self.default_fields, &options) {
            Ok(matcher) => {
                debug!(query = text, "compiled as value set over default fields");
                return Ok((matcher, Reading::Values));
            }
            Err(err) => trace!(query = text, error = %err.message(), "not a value set"),
        }

        if !has_syntax(text) {
            debug!(query = text, "compiled as plain text");
            return Ok((self.plain_text(text)?, Reading::PlainText));
        }

        let matcher = parse(text, &options)?;
        debug!(query = text, "compiled with full grammar");
        Ok((matcher, Reading::Full))
    }

    /// Every word must occur in one of the default fields.
    fn plain_text(&self, text: &str) -> Result<Matcher, QueryError> {
        let words = text
            .split_whitespace()
            .map(|word| {
                let pattern = Pattern::literal(word, self.folding.as_deref()).map_err(|source| {
                    QueryError::from(RegexError {
                        pattern: regex::escape(word),
                        position: None,
                        source,
                    })
                    .with_query(text)
                })?;
                Ok(Matcher::Tag(TagMatch::new(
                    &self.default_fields,
                    ValueMatcher::Pattern(pattern),
                )))
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Ok(Matcher::all(words))
    }
}

/// Whether the text uses tag or numeric syntax.
fn has_syntax(text: &str) -> bool {
    text.contains(['#', '='])
}

/// Current Unix time in seconds.
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

/// A compiled query together with the text it came from.
#[derive(Debug, Clone)]
pub struct Query {
    /// The trimmed query text.
    text: String,
    /// The compiled matcher.
    matcher: Matcher,
}

impl Query {
    /// Compiles `text` with a default [`QueryCompiler`].
    pub fn new(text: &str) -> Result<Self, QueryError> {
        QueryCompiler::new().query(text)
    }

    /// The query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Whether the query filters nothing out.
    pub fn is_everything(&self) -> bool {
        self.matcher.is_everything()
    }

    /// Evaluates the query against one record.
    pub fn matches<R: RecordAccessor + ?Sized>(&self, record: &R) -> bool {
        self.matcher.matches(record)
    }

    /// Yields the records the query matches, in order.
    pub fn filter<'r, R, I>(&self, records: I) -> impl Iterator<Item = &'r R>
    where
        R: RecordAccessor + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        records.into_iter().filter(move |record| self.matches(*record))
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compiles `query`, searching `default_fields` when the query names no fields.
pub fn compile(query: &str, default_fields: &[&str]) -> Result<Matcher, QueryError> {
    QueryCompiler::new()
        .with_default_fields(default_fields)
        .compile(query)
}

/// Whether `query` compiles with default settings. Never fails.
pub fn is_valid(query: &str) -> bool {
    QueryCompiler::new().is_valid(query)
}

/// Whether `query` is usable, either as plain text or as a valid query.
pub fn is_parsable(query: &str) -> bool {
    QueryCompiler::new().is_parsable(query)
}

/// Classifies `query` for tinting a search entry.
pub fn color_hint(query: &str) -> ColorHint {
    QueryCompiler::new().color_hint(query)
}
