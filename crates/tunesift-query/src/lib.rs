//! Query language for filtering a music library.
//!
//! Queries compile into a tree of matchers evaluated against tagged records:
//!
//! - **Plain text**: `abbey road` - every word in artist, album or title
//! - **Tags**: `artist = beatles`, `artist, performer = /^the/`
//! - **Literals**: `artist = "AC/DC"` - whole value, not a regex
//! - **Value sets**: `artist = |(beatles, "rolling stones")`
//! - **Boolean logic**: `&(...)`, `|(...)`, `!query`
//! - **Numbers**: `#(30 < length < 4:00)`, `#(added < 2 weeks)`
//! - **Regex modifiers**: `/beatles/c` (case-sensitive), `/a.b/s`, `/mum/d` (fold accents)
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use tunesift_query::compile;
//!
//! let matcher = compile("artist = beatles", &["artist", "album", "title"]).unwrap();
//!
//! let mut song = BTreeMap::new();
//! song.insert("artist".to_string(), "The Beatles".to_string());
//! assert!(matcher.matches(&song));
//! ```

#![warn(missing_docs)]

mod ast;
mod diacritics;
mod error;
mod fold;
mod lexer;
mod numeric;
mod parser;
mod pattern;
mod query;
mod record;

pub use ast::{Matcher, TagMatch, ValueMatcher};
pub use error::{FoldError, LexError, ParseError, QueryError, QueryErrorKind, RegexError};
pub use fold::FoldingTable;
pub use lexer::{Token, TokenKind, tokenize};
pub use numeric::{NumericCompare, Operand, RelOp, date_key};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING, ParseOptions, parse, parse_values};
pub use pattern::{Pattern, PatternFlags};
pub use query::{
    ColorHint, DEFAULT_FIELDS, Query, QueryCompiler, Reading, color_hint, compile, is_parsable,
    is_valid,
};
pub use record::{RecordAccessor, VALUE_SEPARATOR, split_values};
