use std::sync::Arc;

use recommender_bridge::{
    api::{create_router, AppState},
    config::Config,
    controller::AppController,
    db::Cache,
    services::SharedCache,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let cache: SharedCache = Arc::new(match config.cache_max_size {
        Some(max_size) => Cache::new(max_size),
        None => Cache::unbounded(),
    });

    let controller =
        AppController::new(config.service_settings(), config.default_service, cache)?;

    // Initialize application state
    let state = AppState::new(controller);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        data_directory = %config.data_directory,
        service = %config.default_service,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
