//! The interface between matchers and the records they filter.

use std::{borrow::Cow, collections::BTreeMap};

use crate::numeric::date_key;

/// Separator between the values of a multi-valued field.
pub const VALUE_SEPARATOR: char = '\n';

/// Read access to the fields of a tagged record.
///
/// Field names passed in are already lower-cased. Implementations must be free of
/// side effects so that one compiled matcher can be evaluated from many threads.
pub trait RecordAccessor {
    /// Returns the textual values of `name`, one entry per value of a multi-valued
    /// field. Returns an empty list if the field is absent.
    fn tag_values(&self, name: &str) -> Vec<Cow<'_, str>>;

    /// Returns the numeric value of `name`, or `None` if the record has none.
    fn numeric(&self, name: &str) -> Option<f64>;

    /// Returns the numeric value of `name`, or `default` if the record has none.
    fn numeric_or(&self, name: &str, default: f64) -> f64 {
        self.numeric(name).unwrap_or(default)
    }
}

/// Splits a stored field into its individual values.
pub fn split_values(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(VALUE_SEPARATOR)
}

/// A plain map of tags is a record: numeric lookups try `~#name` first, then parse
/// the textual value. `date` reads as a `YYYYMMDD` key.
impl RecordAccessor for BTreeMap<String, String> {
    fn tag_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.get(name)
            .map(|raw| split_values(raw).map(Cow::Borrowed).collect())
            .unwrap_or_default()
    }

    fn numeric(&self, name: &str) -> Option<f64> {
        if name == "date" {
            return self.get(name).and_then(|raw| date_key(raw.trim()));
        }
        self.get(&format!("~#{name}"))
            .or_else(|| self.get(name))
            .and_then(|raw| raw.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn multi_values_are_split() {
        let song = record(&[("artist", "Simon\nGarfunkel")]);
        assert_eq!(song.tag_values("artist"), vec!["Simon", "Garfunkel"]);
    }

    #[test]
    fn tag_values_sit_beside_map_values() {
        let song = record(&[("artist", "Simon\nGarfunkel"), ("title", "The Boxer")]);
        assert_eq!(song.values().count(), 2);
        assert_eq!(song.tag_values("title"), vec!["The Boxer"]);
    }

    #[test]
    fn missing_field_has_no_values() {
        let song = record(&[]);
        assert!(song.tag_values("artist").is_empty());
    }

    #[test]
    fn numeric_prefers_internal_key() {
        let song = record(&[("~#length", "200"), ("length", "3")]);
        assert_eq!(song.numeric("length"), Some(200.0));
    }

    #[test]
    fn numeric_falls_back_to_text() {
        let song = record(&[("tracknumber", " 7 ")]);
        assert_eq!(song.numeric("tracknumber"), Some(7.0));
        assert_eq!(song.numeric("title"), None);
    }

    #[test]
    fn date_reads_as_key() {
        let song = record(&[("date", "1969-09-26")]);
        assert_eq!(song.numeric("date"), Some(19_690_926.0));
    }

    #[test]
    fn numeric_or_default() {
        let song = record(&[]);
        assert_eq!(song.numeric_or("rating", 0.5), 0.5);
    }
}
