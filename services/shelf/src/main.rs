use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod assistant;
mod context;
mod error;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod session;
mod settings;
mod state;
mod validation;
mod views;

use common::database::{DatabaseConfig, init_pool, ping, run_migrations};
use tokio::net::TcpListener;

use crate::{
    assistant::AssistantConfig,
    session::{SessionConfig, SessionManager},
    settings::ServerSettings,
    state::AppState,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting shelf service");

    let settings = ServerSettings::new()?;
    let session_config = SessionConfig::from_env()?;
    let assistant = assistant::from_config(AssistantConfig::from_env())?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if !ping(&pool).await {
        anyhow::bail!("Failed to reach the database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    let app_state = AppState::new(pool.clone(), SessionManager::new(session_config), assistant);
    let app = routes::create_router(app_state);

    let addr = settings.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Shelf service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing database pool");
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
