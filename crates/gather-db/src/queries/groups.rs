//! Group query functions.

use gather_types::{Group, GroupId};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, name, description, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

/// Insert a new group.
pub fn insert(conn: &Connection, group: &Group) -> Result<()> {
    conn.execute(
        "INSERT INTO study_groups (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![group.id, group.name, group.description, ts(group.created_at)],
    )?;
    Ok(())
}

/// Get a group by id.
pub fn find(conn: &Connection, id: GroupId) -> Result<Option<Group>> {
    let group = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_groups WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(group)
}

pub fn exists(conn: &Connection, id: GroupId) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM study_groups WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// List all groups, newest first.
pub fn list(conn: &Connection) -> Result<Vec<Group>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_groups ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// List the groups a subject belongs to, newest first.
pub fn list_for_subject(conn: &Connection, user_sub: &str) -> Result<Vec<Group>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, g.description, g.created_at
         FROM study_groups g
         JOIN group_members m ON m.group_id = g.id
         WHERE m.user_sub = ?1
         ORDER BY g.created_at DESC, g.rowid DESC",
    )?;
    let rows = stmt
        .query_map([user_sub], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Delete a group; the schema cascades to everything it owns.
pub fn delete(conn: &Connection, id: GroupId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_groups WHERE id = ?1", [id])?;
    Ok(n > 0)
}
