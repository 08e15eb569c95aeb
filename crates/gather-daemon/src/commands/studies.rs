//! Study and session command handlers.

use std::sync::Arc;

use gather_core::services::{sessions, studies};
use gather_core::Actor;
use gather_types::{NewSession, NewStudy, SessionPatch, SessionPosition, StudyPatch};
use serde_json::Value;

use crate::commands::{field, id, payload, run, Result};
use crate::DaemonState;

pub async fn list_studies(state: &Arc<DaemonState>, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    run(state, move |conn| studies::list_studies(conn, group_id)).await
}

pub async fn get_study(state: &Arc<DaemonState>, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    run(state, move |conn| studies::get_study(conn, study_id)).await
}

pub async fn create_study(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let group_id = id(params, "group_id")?;
    let new: NewStudy = payload(params)?;
    run(state, move |conn| studies::create_study(conn, &actor, group_id, &new)).await
}

pub async fn update_study(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    let patch: StudyPatch = payload(params)?;
    run(state, move |conn| studies::update_study(conn, &actor, study_id, &patch)).await
}

pub async fn delete_study(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    run(state, move |conn| studies::delete_study(conn, &actor, study_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

pub async fn list_sessions(state: &Arc<DaemonState>, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    run(state, move |conn| sessions::list_sessions(conn, study_id)).await
}

pub async fn create_session(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    let new: NewSession = payload(params)?;
    run(state, move |conn| sessions::create_session(conn, &actor, study_id, &new)).await
}

pub async fn update_session(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    let patch: SessionPatch = payload(params)?;
    run(state, move |conn| sessions::update_session(conn, &actor, session_id, &patch)).await
}

/// Bulk position update: `{study_id, updates: [{id, position}, ...]}`.
pub async fn reorder_sessions(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let study_id = id(params, "study_id")?;
    let updates: Vec<SessionPosition> = field(params, "updates")?;
    run(state, move |conn| {
        sessions::reorder_sessions(conn, &actor, study_id, &updates)
    })
    .await
}

pub async fn delete_session(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    run(state, move |conn| sessions::delete_session(conn, &actor, session_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}
