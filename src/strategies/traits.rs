use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::types::{ExtractionMethod, ExtractionResult};
use crate::http::FetchError;

/// Reasons a single strategy attempt fails
///
/// These never reach API callers; the pipeline logs them and moves on.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("upstream returned invalid/no data")]
    InvalidData,
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("upstream returned an empty body")]
    EmptyBody,
    #[error("scraping method failed")]
    NoMatch,
    #[error("proxy response has no contents field")]
    MissingContents,
    #[error("no media url in proxied page")]
    NoMediaUrl,
    #[error("attempt timed out after {0:?}")]
    TimedOut(Duration),
}

/// One independent way of turning a share link into a direct media URL
///
/// Implementations are stateless: everything they need comes from their
/// construction-time configuration and the link passed to [`attempt`].
///
/// [`attempt`]: Strategy::attempt
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Identifier reported as `method` when this strategy wins
    fn method(&self) -> ExtractionMethod;

    /// Try to resolve `link`, issuing whatever upstream requests are needed
    async fn attempt(&self, link: &str) -> Result<ExtractionResult, StrategyError>;
}
