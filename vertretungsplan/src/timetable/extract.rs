//! Positional text extraction from DSB timetable markup.
//!
//! Each helper takes plain text already pulled out of the document, so a
//! change in the page format shows up as a failing helper test.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone};

/// Value used for empty cells and absent classes.
pub const PLACEHOLDER: &str = "---";

/// Marker preceding the last-updated timestamp in the page header.
const UPDATED_MARKER: &str = "Stand: ";

/// Accepted title date layouts, tried in order. Two-digit years come first
/// because `%Y` would also accept `26` as the year 26.
const DATE_FORMATS: [&str; 7] = [
    "%d.%m.%y", "%d.%m.%Y", "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%Y-%m-%d",
];

/// Cell text as the DSB export writes an empty cell.
const NBSP: &str = "\u{a0}";

/// Whether a cell holds nothing but a non-breaking space.
pub fn is_blank_cell(text: &str) -> bool {
    text == NBSP
}

/// Cell text, with a lone non-breaking space mapped to [`PLACEHOLDER`].
pub fn cell_value(text: &str) -> String {
    if is_blank_cell(text) {
        PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}

/// Split a class cell such as `"7a, 7b"` into its classes.
pub fn split_classes(text: &str) -> Vec<String> {
    text.split(", ").map(str::to_string).collect()
}

/// Text after `"Stand: "` in the header line, e.g. `"16.10.2026 07:25"`.
pub fn extract_updated(text: &str) -> Option<String> {
    text.split(UPDATED_MARKER)
        .nth(1)
        .map(|s| s.trim().to_string())
}

/// Split a title such as `"16.10.2026 Freitag, Woche A"` into date and weekday.
pub fn parse_title(text: &str) -> Option<(NaiveDate, String)> {
    let mut tokens = text.split_whitespace();
    let date = parse_dmy(tokens.next()?)?;
    let day = tokens.next().unwrap_or_default().replace(',', "");
    Some((date, day))
}

/// Parse a day-first date: `16.10.2026`, `16.10.26`, `16/10/2026`, `16-10-2026`.
///
/// ISO `2026-10-16` dates are accepted too.
pub fn parse_dmy(text: &str) -> Option<NaiveDate> {
    let text = text.trim_end_matches(',');
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Midnight of `date` in the local timezone.
///
/// If midnight does not exist locally (a DST jump), midnight is labelled
/// with the offset in force at that moment.
pub fn local_midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.fixed_offset(),
        None => {
            let offset = Local.offset_from_utc_datetime(&naive).fix();
            let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            DateTime::from_naive_utc_and_offset(utc, offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_cells() {
        assert_eq!(cell_value("\u{a0}"), "---");
        assert_eq!(cell_value("Mathe"), "Mathe");
        assert_eq!(cell_value(""), "");
        assert_eq!(cell_value(" \u{a0}"), " \u{a0}");
    }

    #[test]
    fn class_splitting() {
        assert_eq!(split_classes("7a, 7b"), vec!["7a", "7b"]);
        assert_eq!(split_classes("10c"), vec!["10c"]);
        assert_eq!(split_classes("5a,5b"), vec!["5a,5b"]);
    }

    #[test]
    fn updated_marker() {
        assert_eq!(
            extract_updated(" Stand: 16.10.2026 07:25\n").as_deref(),
            Some("16.10.2026 07:25")
        );
        assert_eq!(extract_updated("no marker here"), None);
    }

    #[test]
    fn title_parsing() {
        let (d, day) = parse_title("16.10.2026 Freitag, Woche A").unwrap();
        assert_eq!(d, date(2026, 10, 16));
        assert_eq!(day, "Freitag");

        let (d, day) = parse_title("\n 2.3.2026 Montag").unwrap();
        assert_eq!(d, date(2026, 3, 2));
        assert_eq!(day, "Montag");

        let (_, day) = parse_title("16.10.2026").unwrap();
        assert_eq!(day, "");

        assert!(parse_title("").is_none());
        assert!(parse_title("Freitag 16.10.2026").is_none());
    }

    #[test]
    fn dmy_variants() {
        assert_eq!(parse_dmy("16.10.2026"), Some(date(2026, 10, 16)));
        assert_eq!(parse_dmy("16.10.26"), Some(date(2026, 10, 16)));
        assert_eq!(parse_dmy("05/01/2026"), Some(date(2026, 1, 5)));
        assert_eq!(parse_dmy("05-01-2026"), Some(date(2026, 1, 5)));
        assert_eq!(parse_dmy("2026-01-05"), Some(date(2026, 1, 5)));
        assert_eq!(parse_dmy("16.10.2026,"), Some(date(2026, 10, 16)));
        assert_eq!(parse_dmy("2.3.2026"), Some(date(2026, 3, 2)));
        assert_eq!(parse_dmy("05-01-26"), Some(date(2026, 1, 5)));
    }

    #[test]
    fn dmy_rejects_garbage() {
        assert_eq!(parse_dmy("32.10.2026"), None);
        assert_eq!(parse_dmy("16.13.2026"), None);
        assert_eq!(parse_dmy("16.10."), None);
        assert_eq!(parse_dmy("16.10"), None);
        assert_eq!(parse_dmy("16.10.2026 08:00"), None);
        assert_eq!(parse_dmy("heute"), None);
    }

    #[test]
    fn midnight_is_local() {
        let dt = local_midnight(date(2026, 10, 16));
        assert_eq!(dt.date_naive(), date(2026, 10, 16));
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 0);

        let expected = Local
            .from_local_datetime(&date(2026, 10, 16).and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap();
        assert_eq!(dt, expected);
    }
}
