//! Compiled value patterns and their regex modifiers.

use std::fmt;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::{error::ParseError, fold::FoldingTable};

/// Flags applied when compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternFlags {
    /// Match letters regardless of case.
    pub case_insensitive: bool,
    /// `.` also matches a newline.
    pub dot_matches_newline: bool,
    /// Force diacritic folding even when the compiler has it turned off.
    pub fold: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            dot_matches_newline: false,
            fold: false,
        }
    }
}

impl PatternFlags {
    /// Applies modifier letters written after a regex, e.g. the `cs` in `/foo/cs`.
    ///
    /// `c` makes matching case-sensitive, `i` case-insensitive, `s` lets `.` match
    /// newlines and `d` forces diacritic folding. `l` is accepted and ignored.
    pub fn with_modifiers(mut self, modifiers: &str, position: usize) -> Result<Self, ParseError> {
        for m in modifiers.chars().map(|c| c.to_ascii_lowercase()) {
            match m {
                'c' => self.case_insensitive = false,
                'i' => self.case_insensitive = true,
                's' => self.dot_matches_newline = true,
                'd' => self.fold = true,
                'l' => {}
                other => {
                    return Err(ParseError::new(
                        format!("invalid regex modifier '{other}'"),
                        Some(position),
                    )
                    .with_lexeme(modifiers));
                }
            }
        }
        Ok(self)
    }
}

/// A compiled regular expression, remembering the source it was written as.
#[derive(Clone)]
pub struct Pattern {
    /// The pattern as written in the query (before folding).
    source: String,
    /// Flags the pattern was compiled with.
    flags: PatternFlags,
    /// The compiled regex.
    regex: Regex,
}

impl Pattern {
    /// Compiles `source`. With a folding table, letters also match their accented
    /// variants; if the pattern cannot be folded it is compiled as written.
    pub fn compile(
        source: &str,
        flags: PatternFlags,
        folding: Option<&FoldingTable>,
    ) -> Result<Self, regex::Error> {
        let folded = folding.and_then(|table| match table.augment(source) {
            Ok(folded) => Some(folded),
            Err(err) => {
                debug!(pattern = source, error = %err, "diacritic folding skipped");
                None
            }
        });

        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(flags.case_insensitive)
                .dot_matches_new_line(flags.dot_matches_newline)
                .multi_line(true)
                .unicode(true)
                .build()
        };

        let regex = match folded.map(|folded| build(&folded)) {
            Some(Ok(regex)) => regex,
            Some(Err(err)) => {
                debug!(pattern = source, error = %err, "folded pattern rejected, using original");
                build(source)?
            }
            None => build(source)?,
        };

        Ok(Self {
            source: source.to_string(),
            flags,
            regex,
        })
    }

    /// Compiles a bare word as a case-insensitive substring search.
    pub fn literal(word: &str, folding: Option<&FoldingTable>) -> Result<Self, regex::Error> {
        Self::compile(&regex::escape(word), PatternFlags::default(), folding)
    }

    /// Whether the pattern occurs anywhere in `value`.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The pattern as written in the query.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flags the pattern was compiled with.
    pub fn flags(&self) -> PatternFlags {
        self.flags
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.flags == other.flags
            && self.regex.as_str() == other.regex.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source.replace('/', "\\/"))?;
        if !self.flags.case_insensitive {
            write!(f, "c")?;
        }
        if self.flags.dot_matches_newline {
            write!(f, "s")?;
        }
        if self.flags.fold {
            write!(f, "d")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_case_insensitive_search() {
        let p = Pattern::compile("beat", PatternFlags::default(), None).unwrap();
        assert!(p.is_match("The Beatles"));
    }

    #[test]
    fn case_sensitive_modifier() {
        let flags = PatternFlags::default().with_modifiers("c", 0).unwrap();
        let p = Pattern::compile("beat", flags, None).unwrap();
        assert!(!p.is_match("Beatles"));
        assert!(p.is_match("beatles"));
    }

    #[test]
    fn later_modifier_wins() {
        let flags = PatternFlags::default().with_modifiers("ci", 0).unwrap();
        assert!(flags.case_insensitive);
    }

    #[test]
    fn dotall_modifier() {
        let plain = Pattern::compile("a.b", PatternFlags::default(), None).unwrap();
        assert!(!plain.is_match("a\nb"));
        let flags = PatternFlags::default().with_modifiers("s", 0).unwrap();
        let dotall = Pattern::compile("a.b", flags, None).unwrap();
        assert!(dotall.is_match("a\nb"));
    }

    #[test]
    fn anchors_are_per_line() {
        let p = Pattern::compile("^b$", PatternFlags::default(), None).unwrap();
        assert!(p.is_match("a\nb"));
    }

    #[test]
    fn locale_modifier_is_accepted() {
        assert!(PatternFlags::default().with_modifiers("l", 0).is_ok());
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        let err = PatternFlags::default().with_modifiers("cx", 7).unwrap_err();
        assert!(err.message.contains("'x'"));
        assert_eq!(err.position, Some(7));
        assert_eq!(err.lexeme.as_deref(), Some("cx"));
    }

    #[test]
    fn literal_escapes_metacharacters() {
        let p = Pattern::literal("a.c", None).unwrap();
        assert!(p.is_match("A.C"));
        assert!(!p.is_match("abc"));
    }

    #[test]
    fn folding_widens_letters() {
        let table = FoldingTable::new();
        let p = Pattern::literal("mum", Some(&table)).unwrap();
        assert!(p.is_match("Múm"));
        assert!(!Pattern::literal("mum", None).unwrap().is_match("Múm"));
        assert_eq!(p.source(), "mum");
    }

    #[test]
    fn unfoldable_pattern_compiles_unchanged() {
        let table = FoldingTable::new();
        let p = Pattern::compile("[a&&a]", PatternFlags::default(), Some(&table)).unwrap();
        assert!(p.is_match("a"));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(Pattern::compile("(", PatternFlags::default(), None).is_err());
    }

    #[test]
    fn display_shows_modifiers() {
        let flags = PatternFlags::default().with_modifiers("cs", 0).unwrap();
        let p = Pattern::compile("a/b", flags, None).unwrap();
        assert_eq!(p.to_string(), "/a\\/b/cs");
    }
}
