use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::traits::{Strategy, StrategyError};
use super::types::{ExtractionMethod, ExtractionResult};
use crate::extract::find_media_url;
use crate::http::HttpClient;

/// Fetches the share page through a CORS proxy answering `{"contents": ...}`
/// and looks for a streamable media URL in the proxied text
#[derive(Debug, Clone)]
pub struct ProxyFetch {
    client: Arc<HttpClient>,
    endpoint: String,
}

impl ProxyFetch {
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Strategy for ProxyFetch {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::ProxyFetch
    }

    async fn attempt(&self, link: &str) -> Result<ExtractionResult, StrategyError> {
        let response = self.client.get(&self.endpoint, &[("url", link)]).await?;

        if !response.is_ok() {
            return Err(StrategyError::Status(response.status.as_u16()));
        }

        let payload: Value =
            serde_json::from_str(&response.body).map_err(|_| StrategyError::MissingContents)?;
        let contents = payload
            .get("contents")
            .and_then(Value::as_str)
            .ok_or(StrategyError::MissingContents)?;

        let video_url = find_media_url(contents).ok_or(StrategyError::NoMediaUrl)?;

        Ok(ExtractionResult::new(video_url, self.method()))
    }
}
