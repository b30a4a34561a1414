//! The matcher tree.
//!
//! A compiled query is a tree of [`Matcher`] nodes evaluated against one record at a
//! time. Trees are immutable and hold no per-record state, so one tree can filter
//! many records concurrently.

use std::{borrow::Cow, fmt};

use crate::{numeric::NumericCompare, pattern::Pattern, record::RecordAccessor};

/// Single-letter shorthands for common tag names.
const TAG_ABBREVIATIONS: &[(&str, &str)] = &[
    ("a", "artist"),
    ("b", "album"),
    ("v", "version"),
    ("t", "title"),
    ("n", "tracknumber"),
    ("d", "date"),
];

/// A node of a compiled query.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Matches when the child does not.
    Negation(Box<Self>),

    /// Matches when every child does. With no children it matches everything.
    Intersection(Vec<Self>),

    /// Matches when any child does.
    Union(Vec<Self>),

    /// Tests textual fields against a value pattern.
    Tag(TagMatch),

    /// Compares a numeric field.
    Numeric(NumericCompare),
}

impl Matcher {
    /// The matcher that accepts every record.
    pub fn everything() -> Self {
        Self::Intersection(Vec::new())
    }

    /// Whether this is the match-everything matcher.
    pub fn is_everything(&self) -> bool {
        matches!(self, Self::Intersection(children) if children.is_empty())
    }

    /// Builds an intersection, unwrapping a single child.
    pub fn all(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::Intersection(children)
        }
    }

    /// Builds a union, unwrapping a single child.
    pub fn any(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::Union(children)
        }
    }

    /// Evaluates the matcher against one record.
    ///
    /// Intersections and unions short-circuit left to right.
    pub fn matches<R: RecordAccessor + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::Negation(child) => !child.matches(record),
            Self::Intersection(children) => children.iter().all(|c| c.matches(record)),
            Self::Union(children) => children.iter().any(|c| c.matches(record)),
            Self::Tag(tag) => tag.matches(record),
            Self::Numeric(cmp) => cmp.matches(record),
        }
    }

    /// Formats the matcher as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Negation(child) => {
                writeln!(f, "{prefix}Negation")?;
                child.fmt_tree(f, indent + 1)
            }
            Self::Intersection(children) if children.is_empty() => {
                writeln!(f, "{prefix}Everything")
            }
            Self::Intersection(children) => {
                writeln!(f, "{prefix}Intersection")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Union(children) => {
                writeln!(f, "{prefix}Union")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Tag(tag) => writeln!(f, "{prefix}Tag({}) {}", tag.fields.join(", "), tag.value),
            Self::Numeric(cmp) => writeln!(f, "{prefix}Numeric({cmp})"),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Tests a list of field aliases against a value matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatch {
    /// Lower-cased field names; the match succeeds if any of them matches.
    fields: Vec<String>,
    /// What the field values must satisfy.
    value: ValueMatcher,
}

impl TagMatch {
    /// Creates a tag match. Names are lower-cased and shorthands (`a`, `t`, ...)
    /// expanded.
    pub fn new<I, S>(fields: I, value: ValueMatcher) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|name| {
                let name = name.as_ref().trim().to_lowercase();
                TAG_ABBREVIATIONS
                    .iter()
                    .find(|(short, _)| *short == name)
                    .map_or(name, |(_, full)| (*full).to_string())
            })
            .collect();
        Self { fields, value }
    }

    /// The field names searched.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The value matcher applied to each field.
    pub fn value(&self) -> &ValueMatcher {
        &self.value
    }

    /// Whether any of the fields satisfies the value matcher.
    ///
    /// A field the record lacks is tested as a single empty value.
    pub fn matches<R: RecordAccessor + ?Sized>(&self, record: &R) -> bool {
        self.fields.iter().any(|name| {
            let values = record.tag_values(name);
            if values.is_empty() {
                self.value.matches(&[Cow::Borrowed("")])
            } else {
                self.value.matches(&values)
            }
        })
    }
}

/// A boolean combination of patterns applied to the values of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMatcher {
    /// Satisfied if the pattern occurs in any value.
    Pattern(Pattern),
    /// Satisfied if the child is not.
    Not(Box<Self>),
    /// Satisfied if every child is.
    All(Vec<Self>),
    /// Satisfied if any child is.
    Any(Vec<Self>),
}

impl ValueMatcher {
    /// Builds an `All`, unwrapping a single child.
    pub fn all(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::All(children)
        }
    }

    /// Builds an `Any`, unwrapping a single child.
    pub fn any(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::Any(children)
        }
    }

    /// Tests the values of one field.
    pub fn matches(&self, values: &[Cow<'_, str>]) -> bool {
        match self {
            Self::Pattern(pattern) => values.iter().any(|v| pattern.is_match(v)),
            Self::Not(child) => !child.matches(values),
            Self::All(children) => children.iter().all(|c| c.matches(values)),
            Self::Any(children) => children.iter().any(|c| c.matches(values)),
        }
    }
}

impl fmt::Display for ValueMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, children) = match self {
            Self::Pattern(pattern) => return write!(f, "{pattern}"),
            Self::Not(child) => return write!(f, "!{child}"),
            Self::All(children) => ("&", children),
            Self::Any(children) => ("|", children),
        };
        write!(f, "{name}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        numeric::{Operand, RelOp},
        pattern::PatternFlags,
    };

    fn pattern(source: &str) -> ValueMatcher {
        ValueMatcher::Pattern(Pattern::compile(source, PatternFlags::default(), None).unwrap())
    }

    fn tag(fields: &[&str], source: &str) -> Matcher {
        Matcher::Tag(TagMatch::new(fields.iter().copied(), pattern(source)))
    }

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn everything_matches_everything() {
        assert!(Matcher::everything().matches(&record(&[])));
        assert!(Matcher::everything().is_everything());
        assert!(!Matcher::Union(vec![]).matches(&record(&[])));
    }

    #[test]
    fn field_names_are_normalized() {
        let t = TagMatch::new(["Artist", " a ", "T"], pattern("x"));
        assert_eq!(t.fields(), ["artist", "artist", "title"]);
    }

    #[test]
    fn any_alias_may_match() {
        let song = record(&[("artist", ""), ("performer", "Abbey")]);
        assert!(tag(&["artist", "performer"], "Abbey").matches(&song));
        assert!(tag(&["performer", "artist"], "Abbey").matches(&song));
        assert!(!tag(&["artist"], "Abbey").matches(&song));
    }

    #[test]
    fn any_value_of_a_multi_valued_field() {
        let song = record(&[("artist", "Simon\nGarfunkel")]);
        assert!(tag(&["artist"], "^Garfunkel$").matches(&song));
    }

    #[test]
    fn missing_field_is_empty_value() {
        let song = record(&[]);
        assert!(tag(&["artist"], "^$").matches(&song));
        let negated = Matcher::Tag(TagMatch::new(
            ["artist"],
            ValueMatcher::Not(Box::new(pattern("beatles"))),
        ));
        assert!(negated.matches(&song));
    }

    #[test]
    fn value_sets_apply_to_the_whole_field() {
        let song = record(&[("artist", "Beatles\nWings")]);
        let not_beatles = Matcher::Tag(TagMatch::new(
            ["artist"],
            ValueMatcher::Not(Box::new(pattern("beatles"))),
        ));
        assert!(!not_beatles.matches(&song));

        let both = Matcher::Tag(TagMatch::new(
            ["artist"],
            ValueMatcher::All(vec![pattern("beatles"), pattern("wings")]),
        ));
        assert!(both.matches(&song));
    }

    #[test]
    fn boolean_nodes() {
        let song = record(&[("artist", "Beatles"), ("title", "Help")]);
        let beatles = tag(&["artist"], "beatles");
        let angie = tag(&["title"], "angie");
        assert!(Matcher::Union(vec![angie.clone(), beatles.clone()]).matches(&song));
        assert!(!Matcher::Intersection(vec![angie.clone(), beatles.clone()]).matches(&song));
        assert!(Matcher::Negation(Box::new(angie)).matches(&song));
    }

    #[test]
    fn single_children_unwrap() {
        let t = tag(&["artist"], "x");
        assert_eq!(Matcher::all(vec![t.clone()]), t);
        assert_eq!(Matcher::any(vec![t.clone()]), t);
        assert!(matches!(Matcher::all(vec![t.clone(), t]), Matcher::Intersection(_)));
    }

    #[test]
    fn display_tree() {
        let m = Matcher::Intersection(vec![
            tag(&["artist", "album"], "abbey"),
            Matcher::Negation(Box::new(Matcher::Numeric(NumericCompare {
                field: "length".into(),
                op: RelOp::Gt,
                operand: Operand::Number(30.0),
            }))),
        ]);
        assert_eq!(
            m.to_string(),
            "Intersection\n  Tag(artist, album) /abbey/\n  Negation\n    Numeric(length > 30)\n"
        );
    }

    #[test]
    fn display_value_sets() {
        let v = ValueMatcher::Any(vec![
            pattern("a"),
            ValueMatcher::Not(Box::new(pattern("b"))),
        ]);
        assert_eq!(v.to_string(), "|(/a/, !/b/)");
    }

    #[test]
    fn matchers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matcher>();
    }
}
