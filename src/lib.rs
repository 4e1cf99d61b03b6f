mod config;
mod dates;
mod db;
mod error;
mod forms;
mod logging;
mod models;
mod mutations;
mod queries;
mod validation;
mod views;
pub mod web;

use anyhow::Context;
use tokio::net::TcpListener;

pub use config::AppConfig;
pub use db::Store;
pub use error::{BookingError, BookingResult};
pub use web::{router, AppContext};

/// Load configuration, prepare the database and serve until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    logging::init(&config)?;
    let timezone = config.display_timezone()?;
    let database_path = config.database_path();

    let seed = config.seed_demo_data;
    let path = database_path.clone();
    tokio::task::spawn_blocking(move || prepare_database(&path, seed))
        .await
        .context("database setup task failed")??;

    let app = router(AppContext::new(database_path.clone(), timezone));
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        database = %database_path.display(),
        timezone = %timezone.name(),
        "show booking listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

fn prepare_database(path: &std::path::Path, seed: bool) -> anyhow::Result<()> {
    let mut store = Store::open(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    if seed {
        store.seed_if_empty()?;
    }
    store.close()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
