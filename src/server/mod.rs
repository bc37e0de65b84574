//! Server assembly: configuration, stores, background tasks, and the router.

pub mod config;
pub mod loader;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use campus_core::{
    wait_for_shutdown_signal, Broadcaster, CampusStore, EventCatalog, ExpirySweeper,
    RegistrationLedger, ShutdownController, TokenSigner,
};

use crate::api;
use crate::websocket::websocket_router;

/// CLI overrides applied on top of the loaded configuration
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

/// Load configuration, wire every component, and serve until shutdown.
pub async fn run(overrides: Overrides) -> Result<()> {
    let mut config = loader::load_config()?;
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = data_dir.display().to_string();
    }

    let db_path = PathBuf::from(&config.data_dir).join("campus.db");
    let store = Arc::new(
        CampusStore::from_path(&db_path)
            .await
            .context("Failed to initialize SQLite store")?,
    );
    info!(path = %db_path.display(), "database ready");

    let signer = Arc::new(match config.auth.token_secret.as_deref() {
        Some(secret) => TokenSigner::from_phrase(secret),
        None => {
            warn!("auth.token_secret not set; tokens will not survive a restart");
            TokenSigner::random()
        }
    });

    let bus = Broadcaster::default();
    let catalog = EventCatalog::new(store.clone(), bus.clone());
    let ledger = RegistrationLedger::new(store.clone(), bus.clone());

    let shutdown = ShutdownController::new();
    let mut sweeper_handle = None;
    if config.sweeper.enabled {
        let sweeper = ExpirySweeper::new(store.clone(), bus.clone());
        let token = shutdown.token();
        sweeper_handle = Some(tokio::spawn(async move {
            sweeper.run(token).await;
        }));
    }

    let app = Router::new()
        .merge(api::health_routes())
        .merge(api::api_router())
        .merge(api::docs_routes())
        .merge(websocket_router())
        .layer(Extension(store))
        .layer(Extension(signer))
        .layer(Extension(bus))
        .layer(Extension(catalog))
        .layer(Extension(ledger))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            server_shutdown.shutdown();
        })
        .await
        .context("Server error")?;

    if let Some(handle) = sweeper_handle {
        let _ = handle.await;
    }
    info!("server stopped");
    Ok(())
}
