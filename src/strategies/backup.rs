use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use super::traits::{Strategy, StrategyError};
use super::types::{ExtractionMethod, ExtractionResult, PayloadKeys, normalize_api_payload};
use crate::http::HttpClient;

// No thumbnail field on this upstream
const KEYS: PayloadKeys = PayloadKeys {
    video_url: &["directUrl", "downloadUrl"],
    title: &["filename", "title"],
    size: &["size", "fileSize"],
    thumbnail: &[],
};

/// Backup extraction API receiving `{"url": <link>}` as a JSON POST
#[derive(Debug, Clone)]
pub struct BackupApi {
    client: Arc<HttpClient>,
    endpoint: String,
}

impl BackupApi {
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Strategy for BackupApi {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::BackupApi
    }

    async fn attempt(&self, link: &str) -> Result<ExtractionResult, StrategyError> {
        let response = self
            .client
            .post_json(&self.endpoint, &json!({ "url": link }))
            .await?;

        if !response.is_ok() {
            debug!(status = response.status.as_u16(), "Backup API rejected request");
            return Err(StrategyError::InvalidData);
        }

        normalize_api_payload(&response.body, &KEYS, self.method())
    }
}
