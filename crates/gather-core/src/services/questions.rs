//! Discussion questions attached to a session. Positions are a suggested
//! order and may repeat.

use gather_db::queries::questions;
use gather_types::{new_id, NewQuestion, QuestionId, QuestionPatch, SessionId, StudyQuestion};
use rusqlite::Connection;
use tracing::info;

use crate::authority::require_leader_of;
use crate::resolve::{self, EntityRef};
use crate::validate;
use crate::{Actor, Entity, Result, ServiceError};

/// Questions ordered by position, then creation time.
pub fn list_questions(conn: &Connection, session_id: SessionId) -> Result<Vec<StudyQuestion>> {
    resolve::lineage(conn, EntityRef::Session(session_id))?;
    Ok(questions::list(conn, session_id)?)
}

pub fn create_question(
    conn: &Connection,
    actor: &Actor,
    session_id: SessionId,
    new: &NewQuestion,
) -> Result<StudyQuestion> {
    let lineage = require_leader_of(conn, EntityRef::Session(session_id), &actor.subject)?;
    validate::required("question", &new.question, None)?;

    let position = match new.position {
        Some(position) => position,
        None => questions::next_position(conn, session_id)?.ok_or_else(|| {
            ServiceError::Invalid("position: no slot after the last question".to_string())
        })?,
    };
    let question = StudyQuestion {
        id: new_id(),
        session_id,
        question: new.question.clone(),
        position,
        created_at: actor.at,
    };
    questions::insert(conn, &question)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, question_id = %question.id, "question created");
    Ok(question)
}

pub fn update_question(
    conn: &Connection,
    actor: &Actor,
    question_id: QuestionId,
    patch: &QuestionPatch,
) -> Result<StudyQuestion> {
    require_leader_of(conn, EntityRef::Question(question_id), &actor.subject)?;
    validate::patched("question", patch.question.as_deref(), None)?;

    questions::update(conn, question_id, patch)?;
    questions::find(conn, question_id)?.ok_or(ServiceError::NotFound(Entity::Question))
}

pub fn delete_question(conn: &Connection, actor: &Actor, question_id: QuestionId) -> Result<()> {
    let lineage = require_leader_of(conn, EntityRef::Question(question_id), &actor.subject)?;
    questions::delete(conn, question_id)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, question_id = %question_id, "question deleted");
    Ok(())
}
