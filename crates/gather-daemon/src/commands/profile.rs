//! Profile command handlers.

use std::sync::Arc;

use gather_core::services::profile;
use gather_core::Actor;
use gather_types::ProfileUpdate;
use serde_json::Value;

use crate::commands::{payload, run, Result};
use crate::DaemonState;

/// Get (creating on first access) the caller's profile.
pub async fn get_profile(state: &Arc<DaemonState>, actor: Actor) -> Result {
    run(state, move |conn| profile::get_profile(conn, &actor)).await
}

/// Set the caller's display name.
pub async fn update_profile(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let update: ProfileUpdate = payload(params)?;
    run(state, move |conn| profile::update_profile(conn, &actor, &update)).await
}
