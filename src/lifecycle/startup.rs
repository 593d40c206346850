//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the configuration document
//! - Initialize subsystems in dependency order
//! - Start the watcher and metrics, then bind the listener
//!
//! # Design Decisions
//! - Fail fast: an invalid configuration or an unbindable address is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::capabilities::{Capabilities, OfflineEngine};
use crate::config::{ConfigError, ConfigStore, ConfigWatcher, GatewaySettings};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::orchestrator::Orchestrator;

pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the gateway until a shutdown signal is received.
pub async fn run(settings: GatewaySettings) -> Result<(), StartupError> {
    logging::init_logging(&settings.observability);
    tracing::info!(version = BUILD_VERSION, "sign-gateway starting");

    let store = match ConfigStore::open(settings.config_path.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(
                path = %settings.config_path.display(),
                error = %e,
                "Configuration is invalid, refusing to start"
            );
            return Err(e.into());
        }
    };
    let watcher = ConfigWatcher::new(store.clone()).spawn();

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let capabilities = Capabilities::from_engine(Arc::new(OfflineEngine::new(store.clone())));
    let orchestrator = Arc::new(Orchestrator::new(
        store,
        capabilities,
        settings.secret_enabled,
        settings.context_path.clone(),
        BUILD_VERSION,
    ));
    tracing::warn!("No signing engine attached, signing and validation calls will answer 503");

    tracing::info!(
        bind_address = %settings.listener.bind_address,
        secret_enabled = settings.secret_enabled,
        request_timeout_secs = settings.listener.request_timeout_secs,
        "Settings loaded"
    );
    let listener = TcpListener::bind(&settings.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        trigger.trigger();
    });

    let served = HttpServer::new(&settings.listener, orchestrator)
        .run(listener, server_shutdown)
        .await;

    if tokio::task::spawn_blocking(move || watcher.join()).await.is_err() {
        tracing::error!("Failed to join config watcher");
    }
    tracing::info!("Shutdown complete");
    served.map_err(StartupError::from)
}
