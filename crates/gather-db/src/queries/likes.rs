//! Passage like query functions.

use gather_types::{GroupId, LikeId, PassageId, StudyPassageLike};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, passage_id, group_id, group_session_id, user_sub, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyPassageLike> {
    Ok(StudyPassageLike {
        id: row.get(0)?,
        passage_id: row.get(1)?,
        group_id: row.get(2)?,
        group_session_id: row.get(3)?,
        user_sub: row.get(4)?,
        created_at: get_ts(row, 5)?,
    })
}

/// Insert a like. At most one per (passage, group, user).
pub fn insert(conn: &Connection, like: &StudyPassageLike) -> Result<()> {
    conn.execute(
        "INSERT INTO study_passage_likes
            (id, passage_id, group_id, group_session_id, user_sub, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            like.id,
            like.passage_id,
            like.group_id,
            like.group_session_id,
            like.user_sub,
            ts(like.created_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: LikeId) -> Result<Option<StudyPassageLike>> {
    let like = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_passage_likes WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(like)
}

/// Passage a like belongs to, if the like exists.
pub fn passage_of(conn: &Connection, id: LikeId) -> Result<Option<PassageId>> {
    let passage_id = conn
        .query_row(
            "SELECT passage_id FROM study_passage_likes WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(passage_id)
}

/// The caller's existing like on a passage within a group.
pub fn find_by_scope(
    conn: &Connection,
    passage_id: PassageId,
    group_id: GroupId,
    user_sub: &str,
) -> Result<Option<StudyPassageLike>> {
    let like = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM study_passage_likes
                 WHERE passage_id = ?1 AND group_id = ?2 AND user_sub = ?3"
            ),
            rusqlite::params![passage_id, group_id, user_sub],
            from_row,
        )
        .optional()?;
    Ok(like)
}

pub fn list(
    conn: &Connection,
    passage_id: PassageId,
    group_id: GroupId,
) -> Result<Vec<StudyPassageLike>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_passage_likes
         WHERE passage_id = ?1 AND group_id = ?2
         ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![passage_id, group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete(conn: &Connection, id: LikeId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_passage_likes WHERE id = ?1", [id])?;
    Ok(n > 0)
}
