use async_trait::async_trait;
use std::sync::Arc;

use super::traits::{Strategy, StrategyError};
use super::types::{ExtractionMethod, ExtractionResult};
use crate::extract::{find_title, find_video_url};
use crate::http::HttpClient;

/// Fetches the share page itself and pattern-matches its HTML
///
/// Scraped pages carry no structured size, so `size` is always unknown.
#[derive(Debug, Clone)]
pub struct DirectScrape {
    client: Arc<HttpClient>,
}

impl DirectScrape {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Strategy for DirectScrape {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::DirectScrape
    }

    async fn attempt(&self, link: &str) -> Result<ExtractionResult, StrategyError> {
        let page = self.client.get(link, &[]).await?;

        if !page.is_ok() {
            return Err(StrategyError::Status(page.status.as_u16()));
        }
        if page.body.trim().is_empty() {
            return Err(StrategyError::EmptyBody);
        }

        let video_url = find_video_url(&page.body).ok_or(StrategyError::NoMatch)?;

        Ok(ExtractionResult::new(video_url, self.method()).with_title(find_title(&page.body)))
    }
}
