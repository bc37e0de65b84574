//! Campus Events - event registration service
//!
//! CLI entry point for the campus events server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod middleware;
mod server;
mod websocket;

/// Campus event registration server
#[derive(Debug, Parser)]
#[command(name = "campus-events", version, about)]
struct Cli {
    /// Bind address (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory for the SQLite database (overrides configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_events=info,campus_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!("Starting Campus Events v{}", env!("CARGO_PKG_VERSION"));

    server::run(server::Overrides {
        host: cli.host,
        port: cli.port,
        data_dir: cli.data_dir,
    })
    .await
}
