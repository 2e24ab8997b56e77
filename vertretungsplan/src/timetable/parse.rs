//! HTML timetable parsing.
//!
//! A DSB timetable page holds one `table.mon_list` per day. The n-th list
//! belongs to the n-th `table.mon_head` header (last-updated stamp) and the
//! n-th `div.mon_title` title (date and weekday).

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::entry::SubstitutionEntry;
use super::extract::{
    PLACEHOLDER, cell_value, extract_updated, is_blank_cell, local_midnight, parse_title,
    split_classes,
};
use super::mapper::TableMapper;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

static MON_LIST: LazyLock<Selector> = LazyLock::new(|| selector("table.mon_list"));
static MON_HEAD: LazyLock<Selector> = LazyLock::new(|| selector("table.mon_head"));
static MON_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.mon_title"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// Values shared by every entry of one table.
#[derive(Debug, Clone)]
struct TableContext<'a> {
    date: DateTime<FixedOffset>,
    day: String,
    updated: String,
    source: &'a str,
}

/// Parse every substitution table in a timetable page.
///
/// Entries come out in document order: table, then row, then class.
/// Tables without a usable title are skipped; rows with fewer than two
/// cells are ignored.
pub fn parse_timetable(html: &str, source: &str, mapper: &TableMapper) -> Vec<SubstitutionEntry> {
    let document = Html::parse_document(html);

    let updates: Vec<Option<String>> = document.select(&MON_HEAD).map(header_updated).collect();
    let titles: Vec<String> = document.select(&MON_TITLE).map(element_text).collect();

    let mut entries = Vec::new();

    for (index, table) in document.select(&MON_LIST).enumerate() {
        let Some((date, day)) = titles.get(index).and_then(|t| parse_title(t)) else {
            warn!(source, index, title = ?titles.get(index), "skipping table without a usable title");
            continue;
        };

        let updated = match updates.get(index).cloned().flatten() {
            Some(updated) => updated,
            None => {
                warn!(source, index, "table header has no last-updated stamp");
                PLACEHOLDER.to_string()
            }
        };

        let context = TableContext {
            date: local_midnight(date),
            day,
            updated,
            source,
        };

        let before = entries.len();
        for row in table.select(&ROW).skip(1) {
            let cells: Vec<String> = row.select(&CELL).map(element_text).collect();
            entries.extend(row_entries(&cells, &context, mapper));
        }
        debug!(source, index, count = entries.len() - before, "parsed table");
    }

    entries
}

/// Concatenated text of an element and its descendants.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Last-updated stamp: the text node right after the last `<span>` of the
/// header's first paragraph.
fn header_updated(head: ElementRef<'_>) -> Option<String> {
    let paragraph = head.select(&PARAGRAPH).next()?;
    let span = paragraph.select(&SPAN).last()?;
    let sibling = span.next_sibling()?;
    let text = sibling.value().as_text()?;
    extract_updated(text)
}

/// Turn one table row into entries, one per class listed in the class cell.
fn row_entries(
    cells: &[String],
    context: &TableContext<'_>,
    mapper: &TableMapper,
) -> Vec<SubstitutionEntry> {
    if cells.len() < 2 {
        return Vec::new();
    }

    let class_index = mapper.class_index();
    let classes = match class_index.and_then(|i| cells.get(i)) {
        Some(cell) => split_classes(cell),
        None => vec![PLACEHOLDER.to_string()],
    };

    classes
        .into_iter()
        .map(|class| {
            let columns = cells
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let value = if Some(i) == class_index && !is_blank_cell(text) {
                        class.clone()
                    } else {
                        cell_value(text)
                    };
                    (mapper.attribute(i), value)
                })
                .collect();

            SubstitutionEntry {
                date: context.date,
                day: context.day.clone(),
                updated: context.updated.clone(),
                source: context.source.to_string(),
                columns,
            }
        })
        .collect()
}
