//! Study query functions.

use gather_types::{GroupId, Study, StudyId, StudyPatch};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, group_id, title, description, is_archived, created_at, updated_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Study> {
    Ok(Study {
        id: row.get(0)?,
        group_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        is_archived: row.get(4)?,
        created_at: get_ts(row, 5)?,
        updated_at: get_ts(row, 6)?,
    })
}

pub fn insert(conn: &Connection, study: &Study) -> Result<()> {
    conn.execute(
        "INSERT INTO studies (id, group_id, title, description, is_archived, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            study.id,
            study.group_id,
            study.title,
            study.description,
            study.is_archived,
            ts(study.created_at),
            ts(study.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: StudyId) -> Result<Option<Study>> {
    let study = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM studies WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(study)
}

/// Owning group of a study, if the study exists.
pub fn group_of(conn: &Connection, id: StudyId) -> Result<Option<GroupId>> {
    let group_id = conn
        .query_row("SELECT group_id FROM studies WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(group_id)
}

/// List a group's studies in creation order.
pub fn list(conn: &Connection, group_id: GroupId) -> Result<Vec<Study>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM studies WHERE group_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Apply a partial update; absent fields keep their stored value.
pub fn update(conn: &Connection, id: StudyId, patch: &StudyPatch, now: u64) -> Result<()> {
    conn.execute(
        "UPDATE studies SET
            title = COALESCE(?2, title),
            description = COALESCE(?3, description),
            is_archived = COALESCE(?4, is_archived),
            updated_at = ?5
         WHERE id = ?1",
        rusqlite::params![id, patch.title, patch.description, patch.is_archived, ts(now)],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: StudyId) -> Result<bool> {
    let n = conn.execute("DELETE FROM studies WHERE id = ?1", [id])?;
    Ok(n > 0)
}
