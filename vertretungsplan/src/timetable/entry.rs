//! Normalised substitution entries.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::mapper::CLASS_ATTRIBUTE;

/// One row of a substitution table, for one class.
///
/// Serialises as a flat mapping: `date`, `day`, `updated`, `source`, then
/// the table columns in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionEntry {
    /// Local midnight of the day the table applies to.
    pub date: DateTime<FixedOffset>,
    /// Weekday label from the table title, e.g. `"Freitag"`.
    pub day: String,
    /// Last-updated text from the page header.
    pub updated: String,
    /// URL of the page the entry was read from.
    pub source: String,
    /// `(attribute, value)` pairs in column order.
    pub columns: Vec<(String, String)>,
}

impl SubstitutionEntry {
    /// `date` as an ISO-8601 string with offset, e.g. `2026-10-16T00:00:00+02:00`.
    pub fn date_iso(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Value of a column attribute.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.as_str())
    }

    pub fn class(&self) -> Option<&str> {
        self.get(CLASS_ATTRIBUTE)
    }
}

impl Serialize for SubstitutionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.columns.len()))?;
        map.serialize_entry("date", &self.date_iso())?;
        map.serialize_entry("day", &self.day)?;
        map.serialize_entry("updated", &self.updated)?;
        map.serialize_entry("source", &self.source)?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
