//! Main HTTP gateway server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use snapgrade_vision::VisionModel;

use crate::{grade_api, health_api, upload_ui};

/// Request bodies carry a full data URI in JSON, so the limit sits above
/// the payload ceiling plus framing rather than at the axum default.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub model: Arc<dyn VisionModel>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            started_at: Instant::now(),
        }
    }
}

/// Starts the gateway HTTP server and runs until shutdown.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = Router::new()
        .route("/api/grade", post(grade_api::grade))
        .route("/api/health", get(health_api::get_health))
        .merge(upload_ui::ui_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections");
}
