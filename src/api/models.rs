//! API models for the resolve and health endpoints.
//!
//! Every resolve response carries a boolean `success`. On success the
//! normalized [`ExtractionResult`] fields are flattened next to it:
//!
//! ```json
//! {
//!   "success": true,
//!   "videoUrl": "https://cdn.example/video.mp4",
//!   "title": "Holiday",
//!   "size": "1.43 MB",
//!   "thumbnail": "https://cdn.example/thumb.jpg",
//!   "method": "PrimaryAPI"
//! }
//! ```
//!
//! On failure only `error` accompanies it:
//!
//! ```json
//! { "success": false, "error": "Invalid TeraBox URL" }
//! ```

use serde::{Deserialize, Serialize};

use crate::observability::MetricsSnapshot;
use crate::strategies::{ExtractionMethod, ExtractionResult};

/// JSON body accepted by the resolve endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

impl From<ExtractionResult> for ResolveResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub strategies: Vec<ExtractionMethod>,
    pub metrics: MetricsSnapshot,
}
