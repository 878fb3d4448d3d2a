//! HTTP surface for the CloudFlow support agent.
//!
//! # Endpoints
//!
//! - `POST /chat` - Run one chat turn through the agent
//! - `GET /health` - Pipeline health probe
//! - `GET /suggestions` - Suggested starter questions
//! - `GET /conversation/:session_id` - Session conversation log
//! - `GET /analytics` - Cross-session analytics
//! - `GET /demo` - Demo scenarios

pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(routes::chat))
        .route("/health", get(routes::health))
        .route("/suggestions", get(routes::suggestions))
        .route("/conversation/:session_id", get(routes::conversation))
        .route("/analytics", get(routes::analytics))
        .route("/demo", get(routes::demo))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given host:port address.
pub async fn serve(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "starting support API server");

    axum::serve(listener, router).await?;

    Ok(())
}
