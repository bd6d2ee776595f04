//! Outbound HTTP client shared by the extraction strategies

use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::HttpSettings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Status and text body of a completed request
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: String,
}

impl Fetched {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// HTTP client with the desktop user agent, timeouts and redirect policy
/// applied to every request
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .user_agent(&settings.user_agent)
            .redirect(Policy::limited(settings.max_redirects))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// GET `url` with the given query parameters appended (URL-encoded)
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Fetched> {
        debug!(url, "GET");

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        Self::execute(request).await
    }

    /// POST `body` as JSON to `url`
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Fetched> {
        debug!(url, "POST");

        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());

        Self::execute(request).await
    }

    async fn execute(request: reqwest::RequestBuilder) -> Result<Fetched> {
        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        debug!(status = status.as_u16(), size = body.len(), "Response received");

        Ok(Fetched { status, body })
    }
}

fn map_send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_redirect() {
        FetchError::TooManyRedirects
    } else if e.is_builder() {
        FetchError::InvalidUrl(e.to_string())
    } else {
        FetchError::RequestFailed(e.to_string())
    }
}
