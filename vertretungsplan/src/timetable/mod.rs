//! Timetable document parsing.
//!
//! DSB timetable pages are Untis HTML exports. This module turns them into
//! [`SubstitutionEntry`] values, one per class and table row.

mod entry;
mod extract;
mod mapper;
mod page;
mod parse;

pub use entry::SubstitutionEntry;
pub use extract::{
    PLACEHOLDER, cell_value, extract_updated, is_blank_cell, local_midnight, parse_dmy,
    parse_title, split_classes,
};
pub use mapper::{CLASS_ATTRIBUTE, DEFAULT_COLUMNS, MapperError, TableMapper};
pub use page::{Aggregate, TimetablePage, flatten_pages, non_empty_pages};
pub use parse::parse_timetable;
