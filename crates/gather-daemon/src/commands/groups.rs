//! Group, membership and invite command handlers.

use std::sync::Arc;

use gather_core::services::{groups, invites};
use gather_core::Actor;
use gather_types::{NewGroup, NewInvite};
use serde_json::Value;

use crate::commands::{field, id, payload, run, Result};
use crate::DaemonState;

pub async fn list_groups(state: &Arc<DaemonState>) -> Result {
    run(state, groups::list_groups).await
}

pub async fn list_my_groups(state: &Arc<DaemonState>, actor: Actor) -> Result {
    run(state, move |conn| groups::list_my_groups(conn, &actor)).await
}

pub async fn get_group(state: &Arc<DaemonState>, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| groups::get_group(conn, group_id)).await
}

pub async fn create_group(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let new: NewGroup = payload(params)?;
    run(state, move |conn| groups::create_group(conn, &actor, &new)).await
}

pub async fn join_group(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| groups::join_group(conn, &actor, group_id)).await
}

pub async fn leave_group(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| groups::leave_group(conn, &actor, group_id)).await?;
    Ok(serde_json::json!({"left": true}))
}

pub async fn list_members(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| groups::list_members(conn, &actor, group_id)).await
}

pub async fn delete_group(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| groups::delete_group(conn, &actor, group_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

/// Create an invite link. `expires_in_days` is optional.
pub async fn create_invite(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    let new: NewInvite = payload(params)?;
    let base_url = state.config.invites.base_url.clone();
    run(state, move |conn| {
        invites::create_invite(conn, &actor, group_id, &new, &base_url)
    })
    .await
}

pub async fn list_invites(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| invites::list_invites(conn, &actor, group_id)).await
}

pub async fn preview_invite(state: &Arc<DaemonState>, params: &Value) -> Result {
    let code: String = field(params, "code")?;
    run(state, move |conn| invites::preview_invite(conn, &code)).await
}

pub async fn join_by_invite(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let code: String = field(params, "code")?;
    run(state, move |conn| invites::join_by_invite(conn, &actor, &code)).await
}

pub async fn revoke_invite(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let code: String = field(params, "code")?;
    run(state, move |conn| invites::revoke_invite(conn, &actor, &code)).await?;
    Ok(serde_json::json!({"revoked": true}))
}
