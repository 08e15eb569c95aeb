//! Diagnostics command handlers.

use std::sync::Arc;

use crate::commands::Result;
use crate::rpc::RpcError;
use crate::DaemonState;

/// Liveness and storage probe. Needs no credential.
pub async fn health(state: &Arc<DaemonState>) -> Result {
    let store = state.store.clone();
    let schema_version = tokio::task::spawn_blocking(move || {
        store.with_connection(|conn| gather_db::migrations::current_version(conn))
    })
    .await
    .map_err(|e| RpcError::internal_error(&format!("task failed: {e}")))?
    .map_err(|e| RpcError::internal_error(&format!("db error: {e}")))?;

    Ok(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "schema_version": schema_version,
    }))
}
