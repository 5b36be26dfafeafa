//! redis-api broker binary entrypoint.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use redisapi_common::config::{AppConfig, ProcessEnv};
use redisapi_managers::ManagerRegistry;

use redisapi_api::routes::create_router;
use redisapi_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("redisapi_api=debug,redisapi_managers=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting redis-api broker...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Select the manager
    let registry =
        ManagerRegistry::with_connect_timeout(Arc::new(ProcessEnv), config.redis_connect_timeout());
    let manager = registry.create(&config.manager)?;
    tracing::info!(
        manager = %config.manager,
        available = ?registry.keys(),
        "Manager selected"
    );

    // Build application state
    let state = AppState::new(Arc::from(manager));

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
