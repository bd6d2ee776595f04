//! Extraction strategies
//!
//! Each strategy resolves a share link through a different upstream and
//! reports a normalized [`ExtractionResult`] or a [`StrategyError`].
//!
//! ## Key Components
//!
//! - [`Strategy`] - Trait every strategy implements
//! - [`PrimaryApi`] - Dedicated extraction API (GET)
//! - [`BackupApi`] - Backup extraction API (JSON POST)
//! - [`DirectScrape`] - Pattern matching over the share page HTML
//! - [`ProxyFetch`] - Share page fetched through a CORS proxy
//!
//! ## Example
//!
//! ```rust,ignore
//! use terafetch::strategies::{PrimaryApi, Strategy};
//!
//! let strategy = PrimaryApi::new(client, "https://extractor.example/api");
//! let result = strategy.attempt("https://terabox.com/s/abc123").await?;
//! println!("{} via {}", result.video_url, result.method);
//! ```

mod backup;
mod primary;
mod proxy;
mod scrape;
mod traits;
pub(crate) mod types;

pub use backup::BackupApi;
pub use primary::PrimaryApi;
pub use proxy::ProxyFetch;
pub use scrape::DirectScrape;
pub use traits::{Strategy, StrategyError};
pub use types::{ExtractionMethod, ExtractionResult, PayloadKeys, normalize_api_payload};
