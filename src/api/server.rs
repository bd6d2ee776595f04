use std::any::Any;
use std::net::SocketAddr;

use axum::{
    Router,
    http::{Method, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{error, info};

use super::{
    error::ApiError,
    services::{health, resolve_link},
    state::AppState,
};
use crate::config::Config;
use crate::pipeline::Pipeline;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Load configuration and serve the API until Ctrl+C / SIGTERM
///
/// `address` overrides `server.bind_addr` when given.
pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    let pipeline = Pipeline::from_config(&config)
        .map_err(|e| format!("Failed to build pipeline: {}", e))?;
    info!(strategies = ?pipeline.methods(), "Resolution pipeline ready");

    let address = address.unwrap_or(config.server.bind_addr);
    let state = AppState::new(config, pipeline);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "terafetch API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ]);

    Router::new()
        .route("/", get(resolve_link).post(resolve_link))
        .route("/api/resolve", get(resolve_link).post(resolve_link))
        .route("/health", get(health))
        .with_state(state)
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Turns a handler panic into the generic server-error response
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %detail, "Request handler panicked");
    ApiError::Internal(detail).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
