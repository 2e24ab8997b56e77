//! HTTP transport abstraction.
//!
//! The client only needs two calls: a JSON POST to the data endpoint and
//! plain GETs for timetable documents. Hosts that already own an HTTP
//! client can plug it in through [`HttpTransport::from_client`] or provide
//! their own [`Transport`].

use std::future::Future;
use std::time::Duration;

use reqwest::Url;

use super::error::DsbError;
use super::types::RequestBody;

/// The network calls the DSB client makes.
pub trait Transport: Send + Sync {
    /// POST `body` as JSON and return the raw response bytes.
    fn post_json(
        &self,
        url: &str,
        body: &RequestBody,
    ) -> impl Future<Output = Result<Vec<u8>, DsbError>> + Send;

    /// GET a document and return it as text.
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, DsbError>> + Send;
}

/// [`Transport`] backed by `reqwest`.
///
/// Relative document URLs are resolved against `base_url`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport with its own `reqwest::Client`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DsbError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::from_client(http, base_url)
    }

    /// Wrap a client owned by the caller.
    pub fn from_client(http: reqwest::Client, base_url: &str) -> Result<Self, DsbError> {
        Ok(Self {
            http,
            base_url: parse_url(base_url)?,
        })
    }

    /// Resolve a possibly relative URL against the base URL.
    pub fn resolve(&self, url: &str) -> Result<Url, DsbError> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(_) => self.base_url.join(url).map_err(|e| DsbError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn parse_url(url: &str) -> Result<Url, DsbError> {
    Url::parse(url).map_err(|e| DsbError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Turn a non-2xx response into [`DsbError::Api`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, DsbError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DsbError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }
    Ok(response)
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &RequestBody) -> Result<Vec<u8>, DsbError> {
        let url = self.resolve(url)?;
        let response = self.http.post(url).json(body).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_text(&self, url: &str) -> Result<String, DsbError> {
        let url = self.resolve(url)?;
        let response = self.http.get(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}
