//! gather-daemon: the Gather backend process.
//!
//! Single OS process running a Tokio async runtime. Clients talk to it with
//! newline-delimited JSON-RPC over a Unix socket; storage work runs on the
//! blocking pool against a shared [`gather_db::Store`].

mod auth;
mod commands;
mod config;
mod rpc;

use std::sync::Arc;

use tracing::{error, info};

use crate::auth::TokenVerifier;
use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Connection source for every request.
    pub store: Arc<gather_db::Store>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Bearer credential verifier.
    pub verifier: Box<dyn TokenVerifier>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.log_level))
                .add_directive("gather=info".parse()?),
        )
        .init();

    info!("Gather daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open database
    let db_path = data_dir.join("gather.db");
    let store = Arc::new(gather_db::Store::open(&db_path)?);
    info!("Database ready at {:?}", db_path);

    // 3. Build daemon state
    let verifier = auth::verifier_from_config(&config.auth)?;
    info!(verifier = %config.auth.verifier, "Token verifier ready");
    let socket_path = config.socket_path();
    let state = Arc::new(DaemonState {
        store,
        config,
        verifier,
    });

    // 4. Run the RPC server until shutdown
    let rpc_server = RpcServer::new(state, socket_path.clone());
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}
