//! Substitutions grouped by class.
//!
//! This is the view a dashboard shows: for each class, today's and upcoming
//! substitutions, plus whether a given tutor group is affected at all.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::timetable::{PLACEHOLDER, SubstitutionEntry, local_midnight};

/// Error returned when a tutor group is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tutor group must not be empty")]
pub struct InvalidTutorGroup;

/// A normalised class identifier such as `7a` or `q1`.
///
/// Whitespace is removed and letters are lowercased, so `" 7 A "` and `"7a"`
/// name the same group.
///
/// # Examples
///
/// ```
/// use vertretungsplan::board::TutorGroup;
///
/// let group = TutorGroup::parse(" 10 B ").unwrap();
/// assert_eq!(group.as_str(), "10b");
/// assert!(group.matches("10B"));
///
/// assert!(TutorGroup::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TutorGroup(String);

impl TutorGroup {
    pub fn parse(s: &str) -> Result<Self, InvalidTutorGroup> {
        let normalised = normalise(s);
        if normalised.is_empty() {
            return Err(InvalidTutorGroup);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a class value from a timetable names this group.
    pub fn matches(&self, class: &str) -> bool {
        normalise(class) == self.0
    }
}

impl fmt::Display for TutorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalise(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a tutor group has substitutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanStatus {
    #[serde(rename = "Vertretung")]
    Substitution,
    #[serde(rename = "Regulär")]
    Regular,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Substitution => f.write_str("Vertretung"),
            PlanStatus::Regular => f.write_str("Regulär"),
        }
    }
}

/// Current and future entries keyed by class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassBoard {
    #[serde(rename = "vertretung")]
    pub by_class: BTreeMap<String, Vec<SubstitutionEntry>>,

    /// `updated` stamp of the last entry seen, past entries included.
    pub last_updated: Option<String>,
}

/// What one tutor group sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView<'a> {
    pub status: PlanStatus,
    pub last_updated: Option<&'a str>,
    #[serde(rename = "vertretung")]
    pub entries: Vec<&'a SubstitutionEntry>,
}

/// Local midnight today.
pub fn today() -> DateTime<FixedOffset> {
    local_midnight(Local::now().date_naive())
}

impl ClassBoard {
    /// Group entries by class, dropping those dated before `today`.
    ///
    /// Entries without a class column are filed under `"---"`.
    pub fn build(
        entries: impl IntoIterator<Item = SubstitutionEntry>,
        today: DateTime<FixedOffset>,
    ) -> Self {
        let mut board = ClassBoard::default();

        for entry in entries {
            board.last_updated = Some(entry.updated.clone());
            if entry.date < today {
                continue;
            }
            let class = entry.class().unwrap_or(PLACEHOLDER).to_string();
            board.by_class.entry(class).or_default().push(entry);
        }

        board
    }

    /// Entries for every class key matching `group`, in key order.
    pub fn for_group(&self, group: &TutorGroup) -> Vec<&SubstitutionEntry> {
        self.by_class
            .iter()
            .filter(|(class, _)| group.matches(class))
            .flat_map(|(_, entries)| entries)
            .collect()
    }

    pub fn status(&self, group: &TutorGroup) -> PlanStatus {
        if self.by_class.keys().any(|class| group.matches(class)) {
            PlanStatus::Substitution
        } else {
            PlanStatus::Regular
        }
    }

    pub fn view(&self, group: &TutorGroup) -> GroupView<'_> {
        GroupView {
            status: self.status(group),
            last_updated: self.last_updated.as_deref(),
            entries: self.for_group(group),
        }
    }

    pub fn total_entries(&self) -> usize {
        self.by_class.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(d: u32) -> DateTime<FixedOffset> {
        local_midnight(NaiveDate::from_ymd_opt(2026, 10, d).unwrap())
    }

    fn entry(class: &str, day: u32, updated: &str) -> SubstitutionEntry {
        SubstitutionEntry {
            date: midnight(day),
            day: "Freitag".into(),
            updated: updated.into(),
            source: "a.htm".into(),
            columns: vec![("class".into(), class.into()), ("lesson".into(), "1".into())],
        }
    }

    #[test]
    fn tutor_group_normalisation() {
        assert_eq!(TutorGroup::parse("7A").unwrap().as_str(), "7a");
        assert_eq!(TutorGroup::parse(" Q 1\t").unwrap().as_str(), "q1");
        assert_eq!(TutorGroup::parse(""), Err(InvalidTutorGroup));
        assert_eq!(TutorGroup::parse(" \n "), Err(InvalidTutorGroup));
    }

    #[test]
    fn groups_by_class_and_drops_past() {
        let entries = vec![
            entry("7a", 15, "s1"),
            entry("7a", 16, "s2"),
            entry("7b", 16, "s3"),
            entry("7a", 19, "s4"),
        ];

        let board = ClassBoard::build(entries, midnight(16));

        assert_eq!(board.by_class.len(), 2);
        assert_eq!(board.by_class["7a"].len(), 2);
        assert_eq!(board.by_class["7b"].len(), 1);
        assert_eq!(board.last_updated.as_deref(), Some("s4"));
        assert_eq!(board.total_entries(), 3);
    }

    #[test]
    fn last_updated_counts_skipped_entries() {
        let board = ClassBoard::build(vec![entry("7a", 16, "s1"), entry("5c", 1, "s2")], midnight(16));
        assert_eq!(board.last_updated.as_deref(), Some("s2"));
        assert!(!board.by_class.contains_key("5c"));
    }

    #[test]
    fn empty_board() {
        let board = ClassBoard::build(Vec::new(), midnight(16));
        assert!(board.by_class.is_empty());
        assert_eq!(board.last_updated, None);
    }

    #[test]
    fn entries_without_class_use_placeholder_key() {
        let mut e = entry("x", 16, "s1");
        e.columns.remove(0);
        let board = ClassBoard::build(vec![e], midnight(16));
        assert_eq!(board.by_class["---"].len(), 1);
    }

    #[test]
    fn group_status_and_view() {
        let board = ClassBoard::build(
            vec![entry("7A", 16, "s1"), entry("8b", 16, "s2")],
            midnight(16),
        );
        let group = TutorGroup::parse("7a").unwrap();

        assert_eq!(board.status(&group), PlanStatus::Substitution);
        assert_eq!(
            board.status(&TutorGroup::parse("9c").unwrap()),
            PlanStatus::Regular
        );

        let view = board.view(&group);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].class(), Some("7A"));
        assert_eq!(view.last_updated, Some("s2"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "Vertretung");
        assert_eq!(json["vertretung"][0]["class"], "7A");
    }

    #[test]
    fn status_display() {
        assert_eq!(PlanStatus::Substitution.to_string(), "Vertretung");
        assert_eq!(PlanStatus::Regular.to_string(), "Regulär");
    }
}
