//! Application builder: wires router, middleware, and state into an Axum app.

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use diagramhub_core::config::{AppConfig, CorsConfig};
use diagramhub_core::{AppError, AppResult, ErrorKind};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> axum::Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the DiagramHub server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let addr = config.server.bind_addr();
    let cors = config.server.cors.clone();
    let app = build_app(AppState::new(config), &cors);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    tracing::info!(addr = %addr, "DiagramHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("DiagramHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
