use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lexfirm::config::AppConfig;
use lexfirm::db;
use lexfirm::web::auth::AuthState;
use lexfirm::web::server::{AppState, start_server};

/// Case-management backend for law firms.
#[derive(Debug, Parser)]
#[command(name = "lexfirm", version, about)]
struct Cli {
    /// Bind address (host:port); overrides LEXFIRM_BIND.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Database file path; overrides LEXFIRM_DB_PATH.
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::resolve().context("failed to resolve configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let database = db::connect_from_config(&config.database)
        .await
        .context("failed to open database")?;
    tracing::info!(path = %config.database.path, "database ready");

    let state = Arc::new(AppState::new(database, AuthState::new(&config.auth)));
    start_server(&config.server, state.clone())
        .await
        .context("failed to start API server")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    if let Some(shutdown_tx) = state.shutdown_tx.write().await.take() {
        let _ = shutdown_tx.send(());
    }

    Ok(())
}
