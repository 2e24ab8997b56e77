//! DSBMobile client error types.

use crate::timetable::MapperError;

/// Errors from fetching and decoding DSBMobile data.
#[derive(Debug, thiserror::Error)]
pub enum DsbError {
    /// Client configuration is invalid (bad table mapper, bad URL).
    #[error("configuration error: {0}")]
    Configuration(#[from] MapperError),

    /// The backend answered with a non-zero result code.
    #[error("{0}")]
    Protocol(String),

    /// Menu navigation found no document URLs at all.
    #[error("Timetable data could not be found.")]
    NotFound,

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A URL could not be parsed or resolved
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Request payload could not be compressed
    #[error("encode error: {0}")]
    Encode(String),

    /// Payload was not valid base64 or gzip
    #[error("decode error: {0}")]
    Decode(String),
}

impl DsbError {
    /// Build a `Json` error, keeping a short excerpt of the offending body.
    pub(crate) fn json(err: serde_json::Error, body: &[u8]) -> Self {
        DsbError::Json {
            message: err.to_string(),
            body: Some(String::from_utf8_lossy(body).chars().take(500).collect()),
        }
    }
}
