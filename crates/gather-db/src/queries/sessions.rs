//! Study session query functions.

use std::collections::BTreeSet;

use gather_types::{SessionId, SessionPatch, SessionPosition, StudyId, StudySession};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, DbError, Result};

const COLUMNS: &str = "id, study_id, title, description, position, created_at, updated_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudySession> {
    Ok(StudySession {
        id: row.get(0)?,
        study_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        position: row.get(4)?,
        created_at: get_ts(row, 5)?,
        updated_at: get_ts(row, 6)?,
    })
}

/// Insert a session. Fails with `Duplicate` if the position is taken.
pub fn insert(conn: &Connection, session: &StudySession) -> Result<()> {
    conn.execute(
        "INSERT INTO study_sessions (id, study_id, title, description, position, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            session.id,
            session.study_id,
            session.title,
            session.description,
            session.position,
            ts(session.created_at),
            ts(session.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: SessionId) -> Result<Option<StudySession>> {
    let session = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_sessions WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(session)
}

/// Owning study of a session, if the session exists.
pub fn study_of(conn: &Connection, id: SessionId) -> Result<Option<StudyId>> {
    let study_id = conn
        .query_row(
            "SELECT study_id FROM study_sessions WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(study_id)
}

/// List a study's sessions in display order.
pub fn list(conn: &Connection, study_id: StudyId) -> Result<Vec<StudySession>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_sessions WHERE study_id = ?1
         ORDER BY position ASC, created_at ASC, rowid ASC"
    ))?;
    let rows = stmt
        .query_map([study_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Position one past the current maximum (1 for an empty study), or
/// `None` when the maximum is already `i64::MAX`.
pub fn next_position(conn: &Connection, study_id: StudyId) -> Result<Option<i64>> {
    let max: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), 0) FROM study_sessions WHERE study_id = ?1",
        [study_id],
        |row| row.get(0),
    )?;
    Ok(max.checked_add(1))
}

/// Apply a partial update; absent fields keep their stored value.
pub fn update(conn: &Connection, id: SessionId, patch: &SessionPatch, now: u64) -> Result<()> {
    conn.execute(
        "UPDATE study_sessions SET
            title = COALESCE(?2, title),
            description = COALESCE(?3, description),
            position = COALESCE(?4, position),
            updated_at = ?5
         WHERE id = ?1",
        rusqlite::params![id, patch.title, patch.description, patch.position, ts(now)],
    )?;
    Ok(())
}

/// Reassign positions for sessions of one study.
///
/// Entries naming a session outside `study_id` are ignored. Positions are
/// first parked on values that no session of the study holds and no entry
/// targets, so that permutations such as `[1,2,3] -> [3,1,2]` never collide
/// mid-way; a collision with the final values still surfaces as
/// `Duplicate`. Callers run this inside a transaction.
pub fn reorder(
    conn: &Connection,
    study_id: StudyId,
    updates: &[SessionPosition],
    now: u64,
) -> Result<usize> {
    let mut held = conn.prepare("SELECT position FROM study_sessions WHERE study_id = ?1")?;
    let mut occupied = held
        .query_map([study_id], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<BTreeSet<i64>>>()?;
    occupied.extend(updates.iter().map(|u| u.position));
    let mut free = (i64::MIN..=i64::MAX).filter(|p| !occupied.contains(p));

    let mut park = conn.prepare(
        "UPDATE study_sessions SET position = ?3 WHERE id = ?1 AND study_id = ?2",
    )?;
    for update in updates {
        let sentinel = free
            .next()
            .ok_or_else(|| DbError::Constraint("no free position to park on".to_string()))?;
        park.execute(rusqlite::params![update.id, study_id, sentinel])?;
    }

    let mut assign = conn.prepare(
        "UPDATE study_sessions SET position = ?3, updated_at = ?4 WHERE id = ?1 AND study_id = ?2",
    )?;
    let mut touched = 0;
    for update in updates {
        touched += assign.execute(rusqlite::params![update.id, study_id, update.position, ts(now)])?;
    }
    Ok(touched)
}

pub fn delete(conn: &Connection, id: SessionId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_sessions WHERE id = ?1", [id])?;
    Ok(n > 0)
}
