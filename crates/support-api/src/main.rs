//! Support API server binary.
//!
//! # Environment Variables
//!
//! - `ELASTIC_ENDPOINT` - Document store URL (unset: seeded in-memory store)
//! - `ELASTIC_API_KEY` - Document store API key
//! - `GEMINI_API_KEY` - Language model API key (unset: offline pattern model)
//! - `GEMINI_MODEL` - Language model name override
//! - `API_HOST` / `API_PORT` - Server bind address (default localhost:8000)

use std::sync::Arc;

use support_agent::SupportConfig;
use support_api::{serve, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,support_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SupportConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::from_config(config).await?);

    serve(state, &addr).await
}
