use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use axum::{Router, routing::post};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, config::GatewayConfig},
    error_handler::AppError,
    routes::context::get_context_route::get_context,
};

/// Loads config from the environment, provisions the index and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let config = GatewayConfig::from_env()?;
    let state = AppState::bootstrap(&config).await?;

    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.api_address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %config.api_address, "context gateway listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("context gateway stopped");
    Ok(())
}

/// Builds the HTTP router over an already-initialized state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", post(get_context)).with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
