//! # Tandem Server
//!
//! Single binary serving the whole HTTP API:
//! - Call signaling (submit/poll envelopes)
//! - Chat history and typing indicators
//! - The join gate
//!
//! Signaling state lives in this process. Run one instance.

use clap::Parser;
use std::net::SocketAddr;
use tandem_api::{build_router, AppState};
use tandem_db::Database;

#[derive(Debug, Parser)]
#[command(name = "tandem", version, about = "Two-party chat and call signaling server")]
struct Cli {
    /// Address to bind (overrides server.host)
    #[arg(long, env = "TANDEM_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long, short, env = "TANDEM_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = tandem_common::config::init()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("Starting Tandem v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::connect(config).await?;

    let state = AppState::new(db, config);
    if state.join_gate.is_open() {
        tracing::warn!("No join password configured, the room is open to anyone");
    }
    tracing::info!(
        retention_secs = config.signaling.retention_secs,
        max_envelopes = config.signaling.max_envelopes,
        poll_interval_ms = config.signaling.poll_interval_ms,
        "Signal store ready"
    );

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let addr = SocketAddr::new(host.parse()?, port);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Tandem stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
