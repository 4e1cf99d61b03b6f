use std::{fs::OpenOptions, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::AppConfig;

const DEFAULT_FILTER: &str = "show_booking=info,show_booking_lib=info,tower_http=info";

/// Console output filtered by `RUST_LOG`, plus an INFO-and-up log file when
/// `error_log` is configured.
pub fn init(config: &AppConfig) -> Result<()> {
    let file_layer = match &config.error_log {
        Some(path) => {
            crate::config::ensure_parent(path);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open error log {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
                ),
        )
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
