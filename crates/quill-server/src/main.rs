//! Quill Server — Application entry point.

use anyhow::Context;
use quill_db::DbManager;
use quill_server::{App, DEFAULT_LOG_FILTER, settings};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .json()
        .init();

    let path =
        std::env::var("QUILL_CONFIG").unwrap_or_else(|_| settings::DEFAULT_CONFIG_PATH.into());
    let config = settings::load(&path)
        .with_context(|| format!("loading configuration from {path}"))?;
    info!(config = %path, "Starting Quill server...");

    if config.auth.jwt_secret.is_empty() {
        warn!("No JWT signing secret configured; logins will fail");
    }

    let db = DbManager::connect_and_migrate(&config.database)
        .await
        .context("connecting to SurrealDB")?;
    let _app = App::new(&db, config.auth);
    info!("Services ready");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("Quill server stopped.");
    Ok(())
}
