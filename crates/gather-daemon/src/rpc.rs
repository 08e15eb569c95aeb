//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! newline-delimited JSON-RPC calls to the command handlers. Every method
//! except `health` requires a bearer credential in the request's `token`
//! field.

use std::path::PathBuf;
use std::sync::Arc;

use gather_core::{Actor, ServiceError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::auth::{self, AuthError};
use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
    /// Bearer credential.
    #[serde(default)]
    pub token: Option<String>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Result or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object. Domain errors carry
/// `{status, reason, detail}` in `data`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self::domain(-32602, 422, "invalid_params", detail)
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"status": 500, "reason": "internal", "detail": detail})),
        }
    }

    /// Unauthorized (-32001).
    pub fn unauthorized(detail: &str) -> Self {
        Self::domain(-32001, 401, "unauthorized", detail)
    }

    fn domain(code: i32, status: u16, reason: &str, detail: &str) -> Self {
        Self {
            code,
            message: reason.to_uppercase(),
            data: Some(serde_json::json!({
                "status": status,
                "reason": reason,
                "detail": detail,
            })),
        }
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        let status = err.status();
        let code = match status {
            404 => -32004,
            403 => -32003,
            409 => -32009,
            400 => -32000,
            422 => -32602,
            _ => -32603,
        };
        if let ServiceError::Db(db) = &err {
            error!("storage failure: {db}");
        }
        Self::domain(code, status, err.discriminator(), &err.detail())
    }
}

impl From<AuthError> for RpcError {
    fn from(err: AuthError) -> Self {
        Self::unauthorized(&err.to_string())
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let response = handle_line(state.clone(), &line).await;

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Decode one request line and dispatch it.
pub async fn handle_line(state: Arc<DaemonState>, line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) if request.jsonrpc != "2.0" => {
            RpcResponse::error(request.id, RpcError::invalid_request())
        }
        Ok(request) => dispatch_request(state, request).await,
        Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
    }
}

/// Authenticate a JSON-RPC request and dispatch it to its command handler.
async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Dispatching RPC method: {}", method);

    if method == "health" {
        return match commands::diagnostics::health(&state).await {
            Ok(value) => RpcResponse::success(id, value),
            Err(err) => RpcResponse::error(id, err),
        };
    }

    let now = gather_core::unix_now();
    let context = match auth::authenticate(
        state.verifier.as_ref(),
        &state.config.auth,
        request.token.as_deref(),
        now,
    ) {
        Ok(context) => context,
        Err(err) => {
            debug!("Rejected {} call: {}", method, err);
            return RpcResponse::error(id, err.into());
        }
    };
    debug!(subject = %context.subject, token_use = %context.token_use, client_id = ?context.client_id, "authenticated");

    let actor = Actor::new(context.subject, now);
    let params = &request.params;

    let result = match method {
        // Profile
        "get_profile" => commands::profile::get_profile(&state, actor).await,
        "update_profile" => commands::profile::update_profile(&state, actor, params).await,

        // Groups & invites
        "list_groups" => commands::groups::list_groups(&state).await,
        "list_my_groups" => commands::groups::list_my_groups(&state, actor).await,
        "get_group" => commands::groups::get_group(&state, params).await,
        "create_group" => commands::groups::create_group(&state, actor, params).await,
        "join_group" => commands::groups::join_group(&state, actor, params).await,
        "leave_group" => commands::groups::leave_group(&state, actor, params).await,
        "list_members" => commands::groups::list_members(&state, actor, params).await,
        "delete_group" => commands::groups::delete_group(&state, actor, params).await,
        "create_invite" => commands::groups::create_invite(&state, actor, params).await,
        "list_invites" => commands::groups::list_invites(&state, actor, params).await,
        "preview_invite" => commands::groups::preview_invite(&state, params).await,
        "join_by_invite" => commands::groups::join_by_invite(&state, actor, params).await,
        "revoke_invite" => commands::groups::revoke_invite(&state, actor, params).await,

        // Studies & sessions
        "list_studies" => commands::studies::list_studies(&state, params).await,
        "get_study" => commands::studies::get_study(&state, params).await,
        "create_study" => commands::studies::create_study(&state, actor, params).await,
        "update_study" => commands::studies::update_study(&state, actor, params).await,
        "delete_study" => commands::studies::delete_study(&state, actor, params).await,
        "list_sessions" => commands::studies::list_sessions(&state, params).await,
        "create_session" => commands::studies::create_session(&state, actor, params).await,
        "update_session" => commands::studies::update_session(&state, actor, params).await,
        "reorder_sessions" => commands::studies::reorder_sessions(&state, actor, params).await,
        "delete_session" => commands::studies::delete_session(&state, actor, params).await,

        // Passages & questions
        "list_passages" => commands::content::list_passages(&state, params).await,
        "create_passage" => commands::content::create_passage(&state, actor, params).await,
        "update_passage" => commands::content::update_passage(&state, actor, params).await,
        "delete_passage" => commands::content::delete_passage(&state, actor, params).await,
        "list_questions" => commands::content::list_questions(&state, params).await,
        "create_question" => commands::content::create_question(&state, actor, params).await,
        "update_question" => commands::content::update_question(&state, actor, params).await,
        "delete_question" => commands::content::delete_question(&state, actor, params).await,

        // Group-scoped social content
        "list_responses" => commands::social::list_responses(&state, params).await,
        "create_response" => commands::social::create_response(&state, actor, params).await,
        "update_response" => commands::social::update_response(&state, actor, params).await,
        "delete_response" => commands::social::delete_response(&state, actor, params).await,
        "list_likes" => commands::social::list_likes(&state, params).await,
        "create_like" => commands::social::create_like(&state, actor, params).await,
        "delete_like" => commands::social::delete_like(&state, actor, params).await,
        "list_comments" => commands::social::list_comments(&state, params).await,
        "create_comment" => commands::social::create_comment(&state, actor, params).await,
        "update_comment" => commands::social::update_comment(&state, actor, params).await,
        "delete_comment" => commands::social::delete_comment(&state, actor, params).await,
        "list_notes" => commands::social::list_notes(&state, params).await,
        "create_note" => commands::social::create_note(&state, actor, params).await,
        "update_note" => commands::social::update_note(&state, actor, params).await,
        "delete_note" => commands::social::delete_note(&state, actor, params).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}
