//! GovQueue server binary.
//!
//! This is the main entry point that wires together configuration, the
//! `PostgreSQL` snapshot store, the queue service, and the observer API
//! server. It loads or creates the day's queue state, applies the lazy
//! day-boundary check, and serves until terminated.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `govqueue-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Load the persisted snapshot (or start a fresh day)
//! 5. Apply the day-boundary check against today's date
//! 6. Persist the (possibly reset) state
//! 7. Serve the observer API

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use govqueue_core::{QueueConfig, QueueService};
use govqueue_db::{PostgresPool, SnapshotStore};
use govqueue_observer::{AppState, ServerConfig};

use crate::error::EngineError;

/// Environment variable naming an alternative config file path.
const CONFIG_ENV: &str = "GOVQUEUE_CONFIG";

/// Default config file path, relative to the working directory.
const CONFIG_PATH: &str = "govqueue-config.yaml";

/// Application entry point for the GovQueue server.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("govqueue-engine starting");
    info!(
        office = config.office.name,
        counters = config.counters.len(),
        categories = config.catalog.len(),
        listen_port = config.infrastructure.listen_port,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL and run migrations.
    let pool = PostgresPool::connect_url(&config.infrastructure.postgres_url)
        .await
        .map_err(EngineError::from)?;
    pool.run_migrations().await.map_err(EngineError::from)?;

    // 4. Load the persisted snapshot, or start a fresh day.
    let today = Local::now().date_naive();
    let store = SnapshotStore::new(pool.pool());
    let mut service = match store.load_snapshot().await.map_err(EngineError::from)? {
        Some(snapshot) => {
            info!(
                tokens = snapshot.tokens.len(),
                stored_date = %snapshot.last_reset_date,
                "Restored persisted queue state"
            );
            QueueService::restore(&config, snapshot).map_err(EngineError::from)?
        }
        None => {
            info!("No persisted state found; starting a fresh day");
            QueueService::from_config(&config, today).map_err(EngineError::from)?
        }
    };

    // 5. Day-boundary check: a date change clears everything.
    if service.reset_if_new_day(today) {
        info!(date = %today, "Day boundary crossed at startup; state cleared");
    }

    // 6. Persist the (possibly reset) state so a restart sees it.
    store
        .save_snapshot(&service.snapshot())
        .await
        .map_err(EngineError::from)?;

    // 7. Serve the observer API.
    let server_config = ServerConfig {
        port: config.infrastructure.listen_port,
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState::with_db(service, pool));
    govqueue_observer::start_server(&server_config, state)
        .await
        .map_err(EngineError::from)?;

    Ok(())
}

/// Load configuration from `$GOVQUEUE_CONFIG`, the default path, or
/// built-in defaults when no file exists.
fn load_config() -> Result<QueueConfig, EngineError> {
    let path: PathBuf = std::env::var(CONFIG_ENV)
        .map_or_else(|_| PathBuf::from(CONFIG_PATH), PathBuf::from);

    if Path::new(&path).exists() {
        Ok(QueueConfig::from_file(&path)?)
    } else {
        Ok(QueueConfig::default())
    }
}
