use axum::{
    Json,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    models::{HealthResponse, ResolveResponse},
    state::AppState,
};
use crate::api::error::ApiError;
use crate::link::is_supported_link;
use crate::observability::Metrics;
use crate::pipeline::Pipeline;
use crate::strategies::ExtractionResult;

/// Resolve endpoint (GET|POST / and /api/resolve)
///
/// ## Flow:
/// 1. Read the (decompressed) body, stopping once it passes the size limit
/// 2. Pick the link: JSON `url`, then form field `url`, then query `url`
/// 3. Reject missing links and links outside the provider's domains
/// 4. Run the strategy pipeline and return the first successful result
#[tracing::instrument(skip_all, fields(request_id = %Uuid::now_v7()))]
pub async fn resolve_link(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    state.metrics.request_received();

    let max_body = usize::try_from(state.config.server.max_body_bytes.as_u64())
        .unwrap_or(usize::MAX);
    let body_bytes = super::utils::read_limited(body, max_body).await?;

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let link = super::utils::pick_link(&body_bytes, content_type, query.as_deref());

    let result = resolve_share_link(&state.pipeline, &state.metrics, link).await?;

    Ok((StatusCode::OK, Json(ResolveResponse::from(result))))
}

/// Validate and resolve one share link
///
/// Shared by the HTTP endpoint and the `resolve` CLI command.
///
/// # Errors
///
/// [`ApiError::MissingUrl`] / [`ApiError::InvalidLink`] before any strategy
/// runs, [`ApiError::ExtractionFailed`] when every strategy failed.
pub async fn resolve_share_link(
    pipeline: &Pipeline,
    metrics: &Metrics,
    link: Option<String>,
) -> Result<ExtractionResult, ApiError> {
    let link = link
        .filter(|link| !link.trim().is_empty())
        .ok_or_else(|| {
            metrics.link_rejected();
            ApiError::MissingUrl
        })?;

    if !is_supported_link(&link) {
        metrics.link_rejected();
        warn!(link = %link, "Rejected link outside supported domains");
        return Err(ApiError::InvalidLink);
    }

    match pipeline.resolve(&link).await {
        Ok(result) => {
            metrics.link_resolved();
            info!(method = %result.method, "Link resolved");
            Ok(result)
        }
        Err(failure) => {
            metrics.resolution_failed();
            Err(failure.into())
        }
    }
}

/// Health check endpoint (GET /health)
///
/// Reports the strategy order and counter snapshot. There are no
/// dependencies to probe, so a response means healthy.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        strategies: state.pipeline.methods(),
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
