pub mod response;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::features::{self, FeatureState};
use crate::middleware;

/// Create the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let upload_limit = state.import.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone())
        .nest("/api/v1", features::router(state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Serve `app` until `signal` resolves, then let in-flight requests drain
///
/// The listener stops accepting as soon as `signal` fires. Connections still open after
/// `drain_timeout` are abandoned and the call returns.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = Arc::new(Notify::new());
    let notify = shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        signal.await;
        notify.notify_one();
    });

    let drain_deadline = async {
        shutdown.notified().await;
        tracing::info!(
            "Waiting up to {} seconds for connections to close",
            drain_timeout.as_secs()
        );
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = async move { server.await } => {
            result?;
            tracing::info!("Server shut down gracefully");
        },
        _ = drain_deadline => {
            tracing::warn!("Connections still open after shutdown timeout, exiting");
        },
    }

    Ok(())
}

/// Health check handler
async fn health_check(State(state): State<FeatureState>) -> Result<Response, AppError> {
    state
        .store
        .health_check()
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("database check failed: {}", e)))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "database": "connected"
        })),
    )
        .into_response())
}

async fn not_found() -> AppError {
    AppError::NotFound("No route matches this path".to_string())
}
