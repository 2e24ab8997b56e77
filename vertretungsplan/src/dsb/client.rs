//! DSBMobile client.
//!
//! Runs the whole pipeline: encode the login payload, POST it, decode the
//! menu tree, find the timetable documents, fetch and parse them.

use std::fmt;
use std::time::Duration;

use chrono::Local;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::timetable::{
    Aggregate, SubstitutionEntry, TableMapper, TimetablePage, flatten_pages, non_empty_pages,
    parse_timetable,
};

use super::codec::{decode_response, encode_request};
use super::error::DsbError;
use super::menu::discover_timetables;
use super::transport::{HttpTransport, Transport};
use super::types::{RequestPayload, ResponseEnvelope};

/// Default `GetData` endpoint.
pub const DEFAULT_DATA_URL: &str = "https://app.dsbcontrol.de/JsonHandler.ashx/GetData";

/// Default number of timetable documents fetched at once.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the DSB client.
#[derive(Clone)]
pub struct DsbConfig {
    /// DSBMobile account id
    pub username: String,
    pub password: String,
    /// `GetData` endpoint (defaults to production DSB)
    pub data_url: String,
    /// Column layout of the timetable tables
    pub table_mapper: TableMapper,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum timetable documents fetched concurrently
    pub max_concurrent: usize,
}

impl DsbConfig {
    /// Create a new config with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            data_url: DEFAULT_DATA_URL.to_string(),
            table_mapper: TableMapper::default(),
            timeout_secs: 30,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into();
        self
    }

    pub fn with_table_mapper(mut self, mapper: TableMapper) -> Self {
        self.table_mapper = mapper;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent document fetches. Zero is treated as one.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

impl fmt::Debug for DsbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsbConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("data_url", &self.data_url)
            .field("table_mapper", &self.table_mapper)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

/// DSBMobile API client.
///
/// Holds only immutable configuration, so one client can serve concurrent
/// fetches as long as its transport can.
#[derive(Debug, Clone)]
pub struct DsbClient<T = HttpTransport> {
    transport: T,
    config: DsbConfig,
}

impl DsbClient<HttpTransport> {
    /// Create a client with its own HTTP transport.
    pub fn new(config: DsbConfig) -> Result<Self, DsbError> {
        let transport =
            HttpTransport::new(&config.data_url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> DsbClient<T> {
    /// Create a client on top of a caller-supplied transport.
    pub fn with_transport(config: DsbConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DsbConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Log in and fetch the decoded menu envelope.
    pub async fn fetch_envelope(&self) -> Result<ResponseEnvelope, DsbError> {
        let payload = RequestPayload::new(
            &self.config.username,
            &self.config.password,
            Local::now().naive_local(),
        );
        let body = encode_request(&payload)?;

        debug!(url = %self.config.data_url, "requesting DSB data");
        let raw = self.transport.post_json(&self.config.data_url, &body).await?;

        let envelope = decode_response(&raw)?;
        debug!(
            menu_items = envelope.result_menu_items.len(),
            "decoded DSB envelope"
        );
        Ok(envelope)
    }

    /// Fetch and parse a single timetable document.
    pub async fn fetch_timetable(&self, url: &str) -> Result<TimetablePage, DsbError> {
        let html = self.transport.get_text(url).await?;
        let entries = parse_timetable(&html, url, &self.config.table_mapper);
        debug!(url, count = entries.len(), "parsed timetable page");
        Ok(TimetablePage::new(url, entries))
    }

    /// All non-empty timetable pages, in discovery order.
    ///
    /// Documents are fetched concurrently up to `max_concurrent`; the
    /// first failing fetch aborts the whole call.
    pub async fn fetch_pages(&self) -> Result<Vec<TimetablePage>, DsbError> {
        let envelope = self.fetch_envelope().await?;
        let urls = discover_timetables(&envelope)?;

        let pages: Vec<TimetablePage> =
            stream::iter(urls.iter().map(|url| self.fetch_timetable(url)))
                .buffered(self.config.max_concurrent.max(1))
                .try_collect()
                .await?;

        let pages = non_empty_pages(pages);
        info!(
            documents = urls.len(),
            pages = pages.len(),
            entries = pages.iter().map(|p| p.entries.len()).sum::<usize>(),
            "fetched substitution plan"
        );
        Ok(pages)
    }

    /// All entries of all pages as one flat list.
    pub async fn fetch_entries(&self) -> Result<Vec<SubstitutionEntry>, DsbError> {
        Ok(flatten_pages(self.fetch_pages().await?))
    }

    /// Pages in the single-list-or-list-of-lists shape.
    pub async fn fetch_aggregate(&self) -> Result<Aggregate, DsbError> {
        Ok(Aggregate::from_pages(self.fetch_pages().await?))
    }
}
