//! Lazy `GroupStudy` / `GroupSession` bindings.
//!
//! The first time a group's member interacts with a session, the group is
//! bound to the session's study and then to the session itself. Both steps
//! are look-up, insert, and on a uniqueness violation look up again: a
//! concurrent writer that created the row first wins and its row is
//! returned to everyone else.

use gather_db::queries::{links, sessions};
use gather_db::DbError;
use gather_types::{
    new_id, GroupId, GroupSession, GroupStudy, GroupStudyId, SessionId, StudyId,
};
use rusqlite::Connection;
use tracing::debug;

use crate::{Entity, Result, ServiceError};

/// Return the binding of `group_id` to `session_id`, creating it (and the
/// group's study binding) if absent.
pub fn ensure_group_session(
    conn: &Connection,
    group_id: GroupId,
    session_id: SessionId,
    now: u64,
) -> Result<GroupSession> {
    let study_id = sessions::study_of(conn, session_id)?
        .ok_or(ServiceError::NotFound(Entity::Session))?;
    let group_study = ensure_group_study(conn, group_id, study_id, now)?;

    if let Some(existing) = links::find_group_session(conn, group_study.id, session_id)? {
        return Ok(existing);
    }
    insert_or_fetch_group_session(conn, group_study.id, session_id, now)
}

/// Return the binding of `group_id` to `study_id`, creating it if absent.
pub fn ensure_group_study(
    conn: &Connection,
    group_id: GroupId,
    study_id: StudyId,
    now: u64,
) -> Result<GroupStudy> {
    if let Some(existing) = links::find_group_study(conn, group_id, study_id)? {
        return Ok(existing);
    }
    insert_or_fetch_group_study(conn, group_id, study_id, now)
}

fn insert_or_fetch_group_study(
    conn: &Connection,
    group_id: GroupId,
    study_id: StudyId,
    now: u64,
) -> Result<GroupStudy> {
    let link = GroupStudy {
        id: new_id(),
        group_id,
        study_id,
        created_at: now,
    };
    match links::insert_group_study(conn, &link) {
        Ok(()) => {
            debug!(group_id = %group_id, study_id = %study_id, "group study created");
            Ok(link)
        }
        Err(DbError::Duplicate(_)) => links::find_group_study(conn, group_id, study_id)?
            .ok_or_else(|| DbError::NotFound("group study after conflict".into()).into()),
        Err(e) => Err(e.into()),
    }
}

fn insert_or_fetch_group_session(
    conn: &Connection,
    group_study_id: GroupStudyId,
    session_id: SessionId,
    now: u64,
) -> Result<GroupSession> {
    let link = GroupSession {
        id: new_id(),
        group_study_id,
        study_session_id: session_id,
        created_at: now,
    };
    match links::insert_group_session(conn, &link) {
        Ok(()) => {
            debug!(group_study_id = %group_study_id, session_id = %session_id, "group session created");
            Ok(link)
        }
        Err(DbError::Duplicate(_)) => links::find_group_session(conn, group_study_id, session_id)?
            .ok_or_else(|| DbError::NotFound("group session after conflict".into()).into()),
        Err(e) => Err(e.into()),
    }
}
