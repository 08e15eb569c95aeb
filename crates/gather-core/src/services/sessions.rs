//! Study sessions and their ordering.
//!
//! `position` is unique within a study. A create without a position takes
//! the next slot after the current maximum.

use gather_db::queries::sessions;
use gather_db::DbError;
use gather_types::{
    new_id, NewSession, SessionId, SessionPatch, SessionPosition, StudyId, StudySession,
};
use rusqlite::Connection;
use tracing::info;

use crate::authority::require_leader_of;
use crate::resolve::{self, EntityRef};
use crate::validate::{self, TITLE_MAX};
use crate::{Actor, Conflict, Entity, Result, ServiceError};

pub fn list_sessions(conn: &Connection, study_id: StudyId) -> Result<Vec<StudySession>> {
    resolve::lineage(conn, EntityRef::Study(study_id))?;
    Ok(sessions::list(conn, study_id)?)
}

pub fn get_session(conn: &Connection, session_id: SessionId) -> Result<StudySession> {
    sessions::find(conn, session_id)?.ok_or(ServiceError::NotFound(Entity::Session))
}

pub fn create_session(
    conn: &Connection,
    actor: &Actor,
    study_id: StudyId,
    new: &NewSession,
) -> Result<StudySession> {
    let lineage = require_leader_of(conn, EntityRef::Study(study_id), &actor.subject)?;
    validate::required("title", &new.title, Some(TITLE_MAX))?;

    let position = match new.position {
        Some(position) => position,
        None => sessions::next_position(conn, study_id)?.ok_or_else(|| {
            ServiceError::Invalid("position: no slot after the last session".to_string())
        })?,
    };
    let session = StudySession {
        id: new_id(),
        study_id,
        title: new.title.clone(),
        description: new.description.clone(),
        position,
        created_at: actor.at,
        updated_at: actor.at,
    };
    sessions::insert(conn, &session).map_err(position_conflict)?;

    info!(
        group_id = %lineage.group_id,
        subject = %actor.subject,
        session_id = %session.id,
        position,
        "session created"
    );
    Ok(session)
}

pub fn update_session(
    conn: &Connection,
    actor: &Actor,
    session_id: SessionId,
    patch: &SessionPatch,
) -> Result<StudySession> {
    require_leader_of(conn, EntityRef::Session(session_id), &actor.subject)?;
    validate::patched("title", patch.title.as_deref(), Some(TITLE_MAX))?;

    sessions::update(conn, session_id, patch, actor.at).map_err(position_conflict)?;
    get_session(conn, session_id)
}

/// Reassign positions of sessions in one study as a single change.
/// Ids that do not belong to the study are skipped.
pub fn reorder_sessions(
    conn: &Connection,
    actor: &Actor,
    study_id: StudyId,
    updates: &[SessionPosition],
) -> Result<Vec<StudySession>> {
    let lineage = require_leader_of(conn, EntityRef::Study(study_id), &actor.subject)?;

    let touched = sessions::reorder(conn, study_id, updates, actor.at).map_err(position_conflict)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, study_id = %study_id, touched, "sessions reordered");
    Ok(sessions::list(conn, study_id)?)
}

pub fn delete_session(conn: &Connection, actor: &Actor, session_id: SessionId) -> Result<()> {
    let lineage = require_leader_of(conn, EntityRef::Session(session_id), &actor.subject)?;
    sessions::delete(conn, session_id)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, session_id = %session_id, "session deleted");
    Ok(())
}

fn position_conflict(err: DbError) -> ServiceError {
    if err.is_duplicate() {
        ServiceError::Conflict(Conflict::PositionTaken)
    } else {
        err.into()
    }
}
