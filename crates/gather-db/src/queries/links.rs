//! Lazily created group bindings: `group_studies` and `group_sessions`.
//!
//! Both tables carry a unique pair constraint; a concurrent creator that
//! loses the race sees `DbError::Duplicate` from `insert_*` and should
//! re-read with the matching `find_*`.

use gather_types::{GroupId, GroupSession, GroupStudy, GroupStudyId, SessionId, StudyId};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

fn group_study_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GroupStudy> {
    Ok(GroupStudy {
        id: row.get(0)?,
        group_id: row.get(1)?,
        study_id: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

fn group_session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GroupSession> {
    Ok(GroupSession {
        id: row.get(0)?,
        group_study_id: row.get(1)?,
        study_session_id: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

pub fn insert_group_study(conn: &Connection, link: &GroupStudy) -> Result<()> {
    conn.execute(
        "INSERT INTO group_studies (id, group_id, study_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![link.id, link.group_id, link.study_id, ts(link.created_at)],
    )?;
    Ok(())
}

pub fn find_group_study(
    conn: &Connection,
    group_id: GroupId,
    study_id: StudyId,
) -> Result<Option<GroupStudy>> {
    let link = conn
        .query_row(
            "SELECT id, group_id, study_id, created_at FROM group_studies
             WHERE group_id = ?1 AND study_id = ?2",
            rusqlite::params![group_id, study_id],
            group_study_from_row,
        )
        .optional()?;
    Ok(link)
}

pub fn insert_group_session(conn: &Connection, link: &GroupSession) -> Result<()> {
    conn.execute(
        "INSERT INTO group_sessions (id, group_study_id, study_session_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            link.id,
            link.group_study_id,
            link.study_session_id,
            ts(link.created_at),
        ],
    )?;
    Ok(())
}

pub fn find_group_session(
    conn: &Connection,
    group_study_id: GroupStudyId,
    session_id: SessionId,
) -> Result<Option<GroupSession>> {
    let link = conn
        .query_row(
            "SELECT id, group_study_id, study_session_id, created_at FROM group_sessions
             WHERE group_study_id = ?1 AND study_session_id = ?2",
            rusqlite::params![group_study_id, session_id],
            group_session_from_row,
        )
        .optional()?;
    Ok(link)
}

/// Number of group bindings for a group (diagnostics and tests).
pub fn count_group_sessions(conn: &Connection, group_id: GroupId) -> Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM group_sessions gs
         JOIN group_studies g ON g.id = gs.group_study_id
         WHERE g.group_id = ?1",
        [group_id],
        |row| row.get(0),
    )?;
    Ok(n.max(0) as u64)
}
