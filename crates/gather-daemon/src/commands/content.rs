//! Passage and question command handlers.

use std::sync::Arc;

use gather_core::services::{passages, questions};
use gather_core::Actor;
use gather_types::{NewPassage, NewQuestion, PassagePatch, QuestionPatch};
use serde_json::Value;

use crate::commands::{id, payload, run, Result};
use crate::DaemonState;

pub async fn list_passages(state: &Arc<DaemonState>, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    run(state, move |conn| passages::list_passages(conn, session_id)).await
}

pub async fn create_passage(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    let new: NewPassage = payload(params)?;
    run(state, move |conn| passages::create_passage(conn, &actor, session_id, &new)).await
}

pub async fn update_passage(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    let patch: PassagePatch = payload(params)?;
    run(state, move |conn| passages::update_passage(conn, &actor, passage_id, &patch)).await
}

pub async fn delete_passage(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    run(state, move |conn| passages::delete_passage(conn, &actor, passage_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

pub async fn list_questions(state: &Arc<DaemonState>, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    run(state, move |conn| questions::list_questions(conn, session_id)).await
}

pub async fn create_question(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    let new: NewQuestion = payload(params)?;
    run(state, move |conn| questions::create_question(conn, &actor, session_id, &new)).await
}

pub async fn update_question(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let question_id = id(params, "question_id")?;
    let patch: QuestionPatch = payload(params)?;
    run(state, move |conn| questions::update_question(conn, &actor, question_id, &patch)).await
}

pub async fn delete_question(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let question_id = id(params, "question_id")?;
    run(state, move |conn| questions::delete_question(conn, &actor, question_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}
