//! DSBMobile substitution plan client.
//!
//! Fetches a school's substitution plan ("Vertretungsplan") from the
//! DSBMobile backend, parses the published timetable pages and groups the
//! substitutions by class.

pub mod board;
pub mod config;
pub mod dsb;
pub mod timetable;
