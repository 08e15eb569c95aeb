//! JSON-RPC command handlers.
//!
//! Each submodule implements the commands for one area. A handler parses
//! its params on the async side, then runs the service call through
//! [`run`], which executes it inside one store transaction on the blocking
//! pool.

pub mod content;
pub mod diagnostics;
pub mod groups;
pub mod profile;
pub mod social;
pub mod studies;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::rpc::RpcError;
use crate::DaemonState;

pub type Result = std::result::Result<Value, RpcError>;

/// Run `f` in one transaction and serialize what it returns.
pub(crate) async fn run<T, F>(state: &Arc<DaemonState>, f: F) -> Result
where
    T: Serialize + Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> gather_core::Result<T> + Send + 'static,
{
    let store = state.store.clone();
    let value = tokio::task::spawn_blocking(move || {
        store.transaction(|tx| {
            let conn: &rusqlite::Connection = tx;
            f(conn)
        })
    })
    .await
    .map_err(|e| RpcError::internal_error(&format!("task failed: {e}")))??;

    serde_json::to_value(value)
        .map_err(|e| RpcError::internal_error(&format!("serialization failed: {e}")))
}

/// A required id param.
pub(crate) fn id(params: &Value, key: &str) -> std::result::Result<Uuid, RpcError> {
    field(params, key)
}

/// A required param of any deserializable type.
pub(crate) fn field<T: DeserializeOwned>(
    params: &Value,
    key: &str,
) -> std::result::Result<T, RpcError> {
    let value = params
        .get(key)
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| RpcError::invalid_params(&format!("{key}: {e}")))
}

/// The whole params object as a payload struct.
pub(crate) fn payload<T: DeserializeOwned>(params: &Value) -> std::result::Result<T, RpcError> {
    serde_json::from_value(params.clone()).map_err(|e| RpcError::invalid_params(&e.to_string()))
}
