//! Runtime configuration for the polling binary.

use std::time::Duration;

use chrono::{NaiveTime, TimeDelta};

use crate::board::{InvalidTutorGroup, TutorGroup};
use crate::dsb::{DEFAULT_DATA_URL, DsbConfig};
use crate::timetable::{MapperError, TableMapper};

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable is unset
    #[error("{0} is not set")]
    Missing(&'static str),

    /// Variable is set but malformed
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },

    #[error(transparent)]
    TableMapper(#[from] MapperError),

    #[error(transparent)]
    TutorGroup(#[from] InvalidTutorGroup),
}

/// When to refresh the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Time between refreshes.
    pub interval: Duration,

    /// Start of the daily refresh window (local time).
    pub window_start: NaiveTime,

    /// End of the daily refresh window (local time), inclusive.
    pub window_end: NaiveTime,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            window_start: NaiveTime::MIN + TimeDelta::hours(6),
            window_end: NaiveTime::MIN + TimeDelta::hours(15),
        }
    }
}

impl PollingConfig {
    pub fn in_window(&self, now: NaiveTime) -> bool {
        self.window_start <= now && now <= self.window_end
    }

    /// Refresh whenever there is no data yet, otherwise only inside the window.
    pub fn should_refresh(&self, now: NaiveTime, has_data: bool) -> bool {
        !has_data || self.in_window(now)
    }
}

/// Everything the binary needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub dsb: DsbConfig,
    pub tutor_group: Option<TutorGroup>,
    pub polling: PollingConfig,
}

impl Config {
    /// Read configuration from `DSB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let username = lookup("DSB_USERNAME").ok_or(ConfigError::Missing("DSB_USERNAME"))?;
        let password = lookup("DSB_PASSWORD").ok_or(ConfigError::Missing("DSB_PASSWORD"))?;

        let table_mapper = match lookup("DSB_TABLEMAPPER") {
            Some(columns) => columns.parse::<TableMapper>()?,
            None => TableMapper::default(),
        };

        let dsb = DsbConfig::new(username, password)
            .with_data_url(lookup("DSB_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_URL.to_string()))
            .with_table_mapper(table_mapper);

        let tutor_group = lookup("DSB_TUTOR_GROUP")
            .map(|g| TutorGroup::parse(&g))
            .transpose()?;

        let mut polling = PollingConfig::default();
        if let Some(secs) = lookup("DSB_POLL_INTERVAL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "DSB_POLL_INTERVAL_SECS",
                message: format!("{e}"),
            })?;
            polling.interval = Duration::from_secs(secs.max(1));
        }
        if let Some(start) = lookup("DSB_POLL_START") {
            polling.window_start = parse_clock("DSB_POLL_START", &start)?;
        }
        if let Some(end) = lookup("DSB_POLL_END") {
            polling.window_end = parse_clock("DSB_POLL_END", &end)?;
        }

        Ok(Self {
            dsb,
            tutor_group,
            polling,
        })
    }
}

/// Parse an `HH:MM` time of day.
fn parse_clock(name: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| ConfigError::Invalid {
        name,
        message: format!("expected HH:MM, got {value:?} ({e})"),
    })
}
