//! Membership query functions.

use gather_types::{GroupId, GroupMember, GroupRole, MemberId};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, group_id, user_sub, role, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GroupMember> {
    let role: String = row.get(3)?;
    let role = role.parse::<GroupRole>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(GroupMember {
        id: row.get(0)?,
        group_id: row.get(1)?,
        user_sub: row.get(2)?,
        role,
        created_at: get_ts(row, 4)?,
    })
}

/// Insert a membership. Fails with `Duplicate` if the subject already
/// belongs to the group.
pub fn insert(conn: &Connection, member: &GroupMember) -> Result<()> {
    conn.execute(
        "INSERT INTO group_members (id, group_id, user_sub, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            member.id,
            member.group_id,
            member.user_sub,
            member.role.as_str(),
            ts(member.created_at),
        ],
    )?;
    Ok(())
}

/// Get the membership of `user_sub` in `group_id`.
pub fn find(conn: &Connection, group_id: GroupId, user_sub: &str) -> Result<Option<GroupMember>> {
    let member = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM group_members WHERE group_id = ?1 AND user_sub = ?2"),
            rusqlite::params![group_id, user_sub],
            from_row,
        )
        .optional()?;
    Ok(member)
}

/// Whether a membership row exists, optionally restricted to one role.
pub fn exists(
    conn: &Connection,
    group_id: GroupId,
    user_sub: &str,
    role: Option<GroupRole>,
) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM group_members
            WHERE group_id = ?1 AND user_sub = ?2 AND (?3 IS NULL OR role = ?3)
         )",
        rusqlite::params![group_id, user_sub, role.map(GroupRole::as_str)],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// List a group's members in join order.
pub fn list(conn: &Connection, group_id: GroupId) -> Result<Vec<GroupMember>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM group_members WHERE group_id = ?1 ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete(conn: &Connection, id: MemberId) -> Result<bool> {
    let n = conn.execute("DELETE FROM group_members WHERE id = ?1", [id])?;
    Ok(n > 0)
}
