//! Combining per-page results.

use serde::Serialize;

use super::entry::SubstitutionEntry;

/// Entries parsed from one timetable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetablePage {
    pub source: String,
    pub entries: Vec<SubstitutionEntry>,
}

impl TimetablePage {
    pub fn new(source: impl Into<String>, entries: Vec<SubstitutionEntry>) -> Self {
        Self {
            source: source.into(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop empty pages, keeping discovery order.
pub fn non_empty_pages(pages: impl IntoIterator<Item = TimetablePage>) -> Vec<TimetablePage> {
    pages.into_iter().filter(|p| !p.is_empty()).collect()
}

/// All entries of all pages, in page order.
pub fn flatten_pages(pages: impl IntoIterator<Item = TimetablePage>) -> Vec<SubstitutionEntry> {
    pages.into_iter().flat_map(|p| p.entries).collect()
}

/// Page results in the shape older consumers expect.
///
/// A single non-empty page is returned as its entry list; anything else
/// (zero or several pages) as a list of per-page lists. Serialises
/// untagged, so JSON output is either `[{...}]` or `[[{...}], [{...}]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Aggregate {
    Single(Vec<SubstitutionEntry>),
    Multiple(Vec<Vec<SubstitutionEntry>>),
}

impl Aggregate {
    /// Aggregate pages in discovery order, skipping empty ones.
    pub fn from_pages(pages: impl IntoIterator<Item = TimetablePage>) -> Self {
        let mut lists: Vec<Vec<SubstitutionEntry>> = non_empty_pages(pages)
            .into_iter()
            .map(|p| p.entries)
            .collect();

        if lists.len() == 1 {
            Aggregate::Single(lists.remove(0))
        } else {
            Aggregate::Multiple(lists)
        }
    }

    /// Flatten either shape into one list.
    pub fn into_entries(self) -> Vec<SubstitutionEntry> {
        match self {
            Aggregate::Single(entries) => entries,
            Aggregate::Multiple(lists) => lists.into_iter().flatten().collect(),
        }
    }
}
