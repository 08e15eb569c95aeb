//! Study passage query functions.

use gather_types::{PassageId, PassagePatch, SessionId, StudyPassage};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str =
    "id, session_id, book, chapter, start_verse, end_verse, version, text, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyPassage> {
    Ok(StudyPassage {
        id: row.get(0)?,
        session_id: row.get(1)?,
        book: row.get(2)?,
        chapter: row.get(3)?,
        start_verse: row.get(4)?,
        end_verse: row.get(5)?,
        version: row.get(6)?,
        text: row.get(7)?,
        created_at: get_ts(row, 8)?,
    })
}

pub fn insert(conn: &Connection, passage: &StudyPassage) -> Result<()> {
    conn.execute(
        "INSERT INTO study_passages
            (id, session_id, book, chapter, start_verse, end_verse, version, text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            passage.id,
            passage.session_id,
            passage.book,
            passage.chapter,
            passage.start_verse,
            passage.end_verse,
            passage.version,
            passage.text,
            ts(passage.created_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: PassageId) -> Result<Option<StudyPassage>> {
    let passage = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_passages WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(passage)
}

/// Session a passage belongs to, if the passage exists.
pub fn session_of(conn: &Connection, id: PassageId) -> Result<Option<SessionId>> {
    let session_id = conn
        .query_row(
            "SELECT session_id FROM study_passages WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(session_id)
}

pub fn list(conn: &Connection, session_id: SessionId) -> Result<Vec<StudyPassage>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_passages WHERE session_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([session_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Apply a partial update; absent fields keep their stored value.
pub fn update(conn: &Connection, id: PassageId, patch: &PassagePatch) -> Result<()> {
    conn.execute(
        "UPDATE study_passages SET
            book = COALESCE(?2, book),
            chapter = COALESCE(?3, chapter),
            start_verse = COALESCE(?4, start_verse),
            end_verse = COALESCE(?5, end_verse),
            version = COALESCE(?6, version),
            text = COALESCE(?7, text)
         WHERE id = ?1",
        rusqlite::params![
            id,
            patch.book,
            patch.chapter,
            patch.start_verse,
            patch.end_verse,
            patch.version,
            patch.text,
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: PassageId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_passages WHERE id = ?1", [id])?;
    Ok(n > 0)
}
