//! Study question query functions.

use gather_types::{QuestionId, QuestionPatch, SessionId, StudyQuestion};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, session_id, question, position, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyQuestion> {
    Ok(StudyQuestion {
        id: row.get(0)?,
        session_id: row.get(1)?,
        question: row.get(2)?,
        position: row.get(3)?,
        created_at: get_ts(row, 4)?,
    })
}

pub fn insert(conn: &Connection, question: &StudyQuestion) -> Result<()> {
    conn.execute(
        "INSERT INTO study_questions (id, session_id, question, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            question.id,
            question.session_id,
            question.question,
            question.position,
            ts(question.created_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: QuestionId) -> Result<Option<StudyQuestion>> {
    let question = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_questions WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(question)
}

/// Session a question belongs to, if the question exists.
pub fn session_of(conn: &Connection, id: QuestionId) -> Result<Option<SessionId>> {
    let session_id = conn
        .query_row(
            "SELECT session_id FROM study_questions WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(session_id)
}

/// List a session's questions in display order.
pub fn list(conn: &Connection, session_id: SessionId) -> Result<Vec<StudyQuestion>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_questions WHERE session_id = ?1
         ORDER BY position ASC, created_at ASC, rowid ASC"
    ))?;
    let rows = stmt
        .query_map([session_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Position one past the current maximum (1 for an empty session), or
/// `None` when the maximum is already `i64::MAX`.
pub fn next_position(conn: &Connection, session_id: SessionId) -> Result<Option<i64>> {
    let max: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), 0) FROM study_questions WHERE session_id = ?1",
        [session_id],
        |row| row.get(0),
    )?;
    Ok(max.checked_add(1))
}

pub fn update(conn: &Connection, id: QuestionId, patch: &QuestionPatch) -> Result<()> {
    conn.execute(
        "UPDATE study_questions SET
            question = COALESCE(?2, question),
            position = COALESCE(?3, position)
         WHERE id = ?1",
        rusqlite::params![id, patch.question, patch.position],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: QuestionId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_questions WHERE id = ?1", [id])?;
    Ok(n > 0)
}
