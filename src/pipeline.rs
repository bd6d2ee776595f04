//! Ordered-fallback resolution pipeline
//!
//! Strategies run one at a time in priority order, each bounded by the
//! attempt timeout. The first result with a non-empty `videoUrl` wins and no
//! later strategy is invoked. Per-strategy failures are logged and never
//! surface past [`Pipeline::resolve`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::{FetchError, HttpClient};
use crate::strategies::{
    BackupApi, DirectScrape, ExtractionMethod, ExtractionResult, PrimaryApi, ProxyFetch,
    Strategy, StrategyError,
};

/// Aggregate failure once every strategy has been tried
#[derive(Debug, Error)]
#[error("All extraction methods failed")]
pub struct ExtractionFailure {
    /// Per-strategy reasons, for diagnostics only
    pub attempts: Vec<(ExtractionMethod, String)>,
}

/// Priority-ordered list of strategies
#[derive(Clone)]
pub struct Pipeline {
    strategies: Vec<Arc<dyn Strategy>>,
    attempt_timeout: Duration,
}

impl Pipeline {
    pub fn new(strategies: Vec<Arc<dyn Strategy>>, attempt_timeout: Duration) -> Self {
        Self {
            strategies,
            attempt_timeout,
        }
    }

    /// Standard order: PrimaryAPI, BackupAPI, DirectScrape, ProxyFetch
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = Arc::new(HttpClient::new(&config.http)?);
        let upstreams = &config.upstreams;

        let strategies: Vec<Arc<dyn Strategy>> = vec![
            Arc::new(PrimaryApi::new(client.clone(), &upstreams.primary_api)),
            Arc::new(BackupApi::new(client.clone(), &upstreams.backup_api)),
            Arc::new(DirectScrape::new(client.clone())),
            Arc::new(ProxyFetch::new(client, &upstreams.cors_proxy)),
        ];

        Ok(Self::new(strategies, config.resolver.attempt_timeout()))
    }

    /// Strategy identifiers in the order they are tried
    pub fn methods(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Resolve an already-validated share link
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionFailure`] when no strategy produced a direct URL.
    #[tracing::instrument(skip(self), fields(strategies = self.strategies.len()))]
    pub async fn resolve(&self, link: &str) -> Result<ExtractionResult, ExtractionFailure> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let method = strategy.method();
            debug!(%method, "Trying strategy");

            let outcome = tokio::time::timeout(self.attempt_timeout, strategy.attempt(link))
                .await
                .unwrap_or(Err(StrategyError::TimedOut(self.attempt_timeout)));

            match outcome {
                Ok(mut result) if !result.video_url.trim().is_empty() => {
                    result.method = method;
                    info!(%method, video_url = %result.video_url, "Resolution successful");
                    return Ok(result);
                }
                Ok(_) => {
                    warn!(%method, "Strategy returned an empty video URL");
                    attempts.push((method, "empty video URL".to_string()));
                }
                Err(err) => {
                    warn!(%method, error = %err, "Strategy failed");
                    attempts.push((method, err.to_string()));
                }
            }
        }

        warn!(tried = attempts.len(), "All strategies failed");
        Err(ExtractionFailure { attempts })
    }
}
