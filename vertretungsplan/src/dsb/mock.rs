//! In-memory transport for testing without DSB access.
//!
//! Serves a canned `GetData` response and canned timetable documents keyed
//! by URL, and records every request so tests can inspect what was sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::codec::pack;
use super::error::DsbError;
use super::transport::Transport;
use super::types::RequestBody;

/// Mock transport that answers from memory.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    data_response: Option<Vec<u8>>,
    pages: HashMap<String, String>,
    posted: Arc<Mutex<Vec<RequestBody>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `GetData` with this envelope, packed the way the backend does.
    pub fn with_envelope(self, envelope: &serde_json::Value) -> Result<Self, DsbError> {
        let body = serde_json::json!({ "d": pack(envelope)? });
        let raw = serde_json::to_vec(&body).map_err(|e| DsbError::Json {
            message: e.to_string(),
            body: None,
        })?;
        Ok(self.with_raw_response(raw))
    }

    /// Answer `GetData` with these exact bytes.
    pub fn with_raw_response(mut self, raw: impl Into<Vec<u8>>) -> Self {
        self.data_response = Some(raw.into());
        self
    }

    /// Serve `html` for GET requests to `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Bodies received by `post_json`, in order.
    pub fn posted(&self) -> Vec<RequestBody> {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs requested through `get_text`, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for MockTransport {
    async fn post_json(&self, url: &str, body: &RequestBody) -> Result<Vec<u8>, DsbError> {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body.clone());

        self.data_response.clone().ok_or_else(|| DsbError::Api {
            status: 404,
            message: format!("no mock response for {url}"),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, DsbError> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        self.pages.get(url).cloned().ok_or_else(|| DsbError::Api {
            status: 404,
            message: format!("no mock page for {url}"),
        })
    }
}
