//! Bindery Server - HTTP API for assembling EPUB and MOBI books

use anyhow::Result;
use bindery_server::{config::ServerConfig, routes, state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bindery_server=debug,bindery_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Create application state
    let state = state::AppState::new(&config).await?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    tracing::info!("Starting server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
