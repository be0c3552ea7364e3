use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use portfolio_studio::config::Config;
use portfolio_studio::{routes, scheduler, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_studio=info".parse()?),
        )
        .init();

    info!("Starting portfolio back office");

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;

    let state = AppState::initialize(config).await?;
    info!("Content backend: {}", state.store.name());

    // Background thread polling
    let _scheduler =
        scheduler::start_scheduler(Arc::clone(&state.config), Arc::clone(&state.watcher)).await?;

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
