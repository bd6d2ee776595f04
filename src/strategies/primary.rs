use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::traits::{Strategy, StrategyError};
use super::types::{ExtractionMethod, ExtractionResult, PayloadKeys, normalize_api_payload};
use crate::http::HttpClient;

const KEYS: PayloadKeys = PayloadKeys {
    video_url: &["downloadUrl", "videoUrl", "directUrl"],
    title: &["title", "filename"],
    size: &["size", "fileSize"],
    thumbnail: &["thumbnail", "thumb"],
};

/// Dedicated extraction API queried with `GET <endpoint>?url=<link>`
#[derive(Debug, Clone)]
pub struct PrimaryApi {
    client: Arc<HttpClient>,
    endpoint: String,
}

impl PrimaryApi {
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Strategy for PrimaryApi {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PrimaryApi
    }

    async fn attempt(&self, link: &str) -> Result<ExtractionResult, StrategyError> {
        let response = self.client.get(&self.endpoint, &[("url", link)]).await?;

        if !response.is_ok() {
            debug!(status = response.status.as_u16(), "Primary API rejected request");
            return Err(StrategyError::InvalidData);
        }

        normalize_api_payload(&response.body, &KEYS, self.method())
    }
}
