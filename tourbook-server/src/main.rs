//! Tourbook Server
//!
//! Serves the tour-booking HTTP API over an in-memory or SQLite document
//! store, depending on configuration.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tourbook_core::TokenService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tourbook_server::{
    routes, AppState, Config, DocumentStore, InMemoryStore, SqliteStore, StoreHandle,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourbook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    let tokens = TokenService::with_lifetime(&config.token_secret, config.token_lifetime())?;

    match config.database_path.clone() {
        Some(path) => serve(&config, tokens, SqliteStore::open(&path)?).await,
        None => {
            tracing::warn!("DATABASE_PATH not set, documents will not survive a restart");
            serve(&config, tokens, InMemoryStore::new()).await
        }
    }
}

async fn serve<D>(config: &Config, tokens: TokenService, store: D) -> Result<()>
where
    D: DocumentStore + 'static,
{
    let store = StoreHandle::new(store, config.store_timeout());
    store.ping().await?;
    tracing::info!("Document store is reachable");

    let state = Arc::new(AppState::new(tokens, store));
    let app = routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
