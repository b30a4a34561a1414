//! A tagged song record.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Deserializer, Serialize};
use tunesift_query::{RecordAccessor, VALUE_SEPARATOR, date_key, split_values};

/// Tags combined into the `~people` pseudo-field, in display order.
const PEOPLE_TAGS: &[&str] = &[
    "artist",
    "albumartist",
    "performer",
    "composer",
    "conductor",
    "lyricist",
    "arranger",
];

/// Counters and timestamps that read as zero when a song has never set them.
const ZERO_DEFAULTS: &[&str] = &[
    "playcount",
    "skipcount",
    "added",
    "mtime",
    "lastplayed",
    "laststarted",
];

/// Rating of a song nobody has rated.
const DEFAULT_RATING: f64 = 0.5;

/// One value of a tag as it appears in a library file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TagValue {
    /// A single text value.
    Text(String),
    /// A number, stored under `~#name`.
    Number(f64),
    /// Several text values.
    List(Vec<String>),
}

/// A song: a set of lower-case tag names mapped to newline-joined values.
///
/// Numeric pseudo-fields such as length or play count live under `~#name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "BTreeMap<String, String>")]
pub struct Song {
    /// Tag values keyed by lower-case name.
    tags: BTreeMap<String, String>,
}

impl Song {
    /// Creates a song with no tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a song from `(name, value)` pairs. Repeated names add values.
    pub fn from_tags<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut song = Self::new();
        for (name, value) in tags {
            song.add(name.as_ref(), value.as_ref());
        }
        song
    }

    /// Replaces all values of `name`.
    pub fn set(&mut self, name: &str, value: &str) {
        self.tags.insert(name.to_lowercase(), value.to_string());
    }

    /// Appends a value to `name`.
    pub fn add(&mut self, name: &str, value: &str) {
        self.tags
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(VALUE_SEPARATOR);
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Sets the numeric pseudo-field `~#name`.
    pub fn set_numeric(&mut self, name: &str, value: f64) {
        let key = numeric_key(name);
        self.tags.insert(key, value.to_string());
    }

    /// The raw, newline-joined value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All tags in name order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of tags set.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the song has no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Values of every people tag, without repeats.
    fn people(&self) -> Vec<Cow<'_, str>> {
        let mut people: Vec<Cow<'_, str>> = Vec::new();
        for value in PEOPLE_TAGS
            .iter()
            .filter_map(|tag| self.tags.get(*tag))
            .flat_map(|raw| split_values(raw))
        {
            if !people.iter().any(|p| p == value) {
                people.push(Cow::Borrowed(value));
            }
        }
        people
    }

    /// The file name or containing directory of `~filename`.
    fn path_part(&self, basename: bool) -> Vec<Cow<'_, str>> {
        let Some(filename) = self.tags.get("~filename") else {
            return Vec::new();
        };
        let trimmed = filename.trim_end_matches('/');
        let (dir, base) = trimmed.rsplit_once('/').unwrap_or(("", trimmed));
        vec![Cow::Borrowed(if basename { base } else { dir })]
    }
}

/// The storage key of a numeric pseudo-field.
fn numeric_key(name: &str) -> String {
    let name = name.to_lowercase();
    if name.starts_with("~#") {
        name
    } else {
        format!("~#{name}")
    }
}

/// The leading four-digit year of a date tag.
fn year_of(date: &str) -> Option<f64> {
    let year = date.trim().get(..4)?;
    if year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

impl RecordAccessor for Song {
    fn tag_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        match name {
            "~people" => self.people(),
            "~basename" => self.path_part(true),
            "~dirname" => self.path_part(false),
            _ => self
                .tags
                .get(name)
                .or_else(|| self.tags.get(&format!("~{name}")))
                .map(|raw| split_values(raw).map(Cow::Borrowed).collect())
                .unwrap_or_default(),
        }
    }

    fn numeric(&self, name: &str) -> Option<f64> {
        if let Some(value) = self
            .tags
            .get(&numeric_key(name))
            .and_then(|raw| raw.trim().parse().ok())
        {
            return Some(value);
        }

        match name {
            "year" => self.tags.get("date").and_then(|d| year_of(d)),
            "date" => self.tags.get("date").and_then(|d| date_key(d)),
            "rating" => Some(DEFAULT_RATING),
            _ if ZERO_DEFAULTS.contains(&name) => Some(0.0),
            _ => self.tags.get(name).and_then(|raw| raw.trim().parse().ok()),
        }
    }
}

/// Reads a JSON object of tags. Numbers become numeric pseudo-fields and arrays
/// become multiple values.
impl<'de> Deserialize<'de> for Song {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, TagValue>::deserialize(deserializer)?;
        let mut song = Self::new();
        for (name, value) in raw {
            match value {
                TagValue::Text(text) => song.set(&name, &text),
                TagValue::Number(number) => song.set_numeric(&name, number),
                TagValue::List(values) => {
                    song.set(&name, &values.join(&VALUE_SEPARATOR.to_string()));
                }
            }
        }
        Ok(song)
    }
}

impl From<Song> for BTreeMap<String, String> {
    fn from(song: Song) -> Self {
        song.tags
    }
}

#[cfg(test)]
mod tests {
    use tunesift_query::compile;

    use super::*;

    fn song(pairs: &[(&str, &str)]) -> Song {
        Song::from_tags(pairs.iter().copied())
    }

    #[test]
    fn names_are_lowercased() {
        let s = song(&[("ARTIST", "Beatles")]);
        assert_eq!(s.get("artist"), Some("Beatles"));
        assert_eq!(s.get("Artist"), Some("Beatles"));
    }

    #[test]
    fn repeated_tags_become_multiple_values() {
        let s = song(&[("artist", "Simon"), ("artist", "Garfunkel")]);
        assert_eq!(s.get("artist"), Some("Simon\nGarfunkel"));
        assert_eq!(s.tag_values("artist"), vec!["Simon", "Garfunkel"]);
    }

    #[test]
    fn internal_values_are_found_without_tilde() {
        let s = song(&[("~filename", "/music/help.flac")]);
        assert_eq!(s.tag_values("filename"), vec!["/music/help.flac"]);
    }

    #[test]
    fn people_joins_and_dedups() {
        let s = song(&[
            ("artist", "Lennon"),
            ("composer", "Lennon\nMcCartney"),
            ("performer", "Starr"),
        ]);
        assert_eq!(s.tag_values("~people"), vec!["Lennon", "Starr", "McCartney"]);
    }

    #[test]
    fn path_parts() {
        let s = song(&[("~filename", "/music/beatles/help.flac")]);
        assert_eq!(s.tag_values("~basename"), vec!["help.flac"]);
        assert_eq!(s.tag_values("~dirname"), vec!["/music/beatles"]);
        assert!(Song::new().tag_values("~basename").is_empty());
    }

    #[test]
    fn numeric_fields() {
        let mut s = song(&[("date", "1965-08-06"), ("tracknumber", "3")]);
        s.set_numeric("length", 138.0);
        assert_eq!(s.numeric("length"), Some(138.0));
        assert_eq!(s.numeric("year"), Some(1965.0));
        assert_eq!(s.numeric("date"), Some(19_650_806.0));
        assert_eq!(s.numeric("tracknumber"), Some(3.0));
        assert_eq!(s.numeric("playcount"), Some(0.0));
        assert_eq!(s.numeric("rating"), Some(0.5));
        assert_eq!(s.numeric("bpm"), None);
    }

    #[test]
    fn stored_numeric_beats_default() {
        let mut s = Song::new();
        s.set_numeric("~#rating", 1.0);
        assert_eq!(s.numeric("rating"), Some(1.0));
    }

    #[test]
    fn year_needs_four_digits() {
        assert_eq!(year_of("65"), None);
        assert_eq!(year_of("19x5"), None);
        assert_eq!(year_of("2001-01"), Some(2001.0));
    }

    #[test]
    fn deserializes_mixed_values() {
        let s: Song = serde_json::from_str(
            r#"{"Artist": "Beatles", "genre": ["Rock", "Pop"], "length": 138, "~#playcount": 4}"#,
        )
        .unwrap();
        assert_eq!(s.get("artist"), Some("Beatles"));
        assert_eq!(s.tag_values("genre"), vec!["Rock", "Pop"]);
        assert_eq!(s.numeric("length"), Some(138.0));
        assert_eq!(s.numeric("playcount"), Some(4.0));
    }

    #[test]
    fn serializes_as_flat_map() {
        let s = song(&[("artist", "Beatles")]);
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"artist":"Beatles"}"#
        );
    }

    #[test]
    fn queries_see_defaults() {
        let s = song(&[("title", "Help")]);
        assert!(compile("#(playcount = 0)", &["title"]).unwrap().matches(&s));
        assert!(compile("#(rating > 0.4)", &["title"]).unwrap().matches(&s));
        assert!(compile("~people = /^$/", &["title"]).unwrap().matches(&s));
    }
}
