//! Invite code query functions.

use gather_types::{GroupId, InviteCode, InviteId};
use rusqlite::{Connection, OptionalExtension};

use super::{get_opt_ts, get_ts};
use crate::{ts, Result};

const COLUMNS: &str = "id, code, group_id, created_by, created_at, expires_at, is_active";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InviteCode> {
    Ok(InviteCode {
        id: row.get(0)?,
        code: row.get(1)?,
        group_id: row.get(2)?,
        created_by: row.get(3)?,
        created_at: get_ts(row, 4)?,
        expires_at: get_opt_ts(row, 5)?,
        is_active: row.get(6)?,
    })
}

pub fn insert(conn: &Connection, invite: &InviteCode) -> Result<()> {
    conn.execute(
        "INSERT INTO invite_codes (id, code, group_id, created_by, created_at, expires_at, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            invite.id,
            invite.code,
            invite.group_id,
            invite.created_by,
            ts(invite.created_at),
            invite.expires_at.map(ts),
            invite.is_active,
        ],
    )?;
    Ok(())
}

/// Get an invite by its code string.
pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<InviteCode>> {
    let invite = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM invite_codes WHERE code = ?1"),
            [code],
            from_row,
        )
        .optional()?;
    Ok(invite)
}

/// List a group's active invites, newest first.
pub fn list_active(conn: &Connection, group_id: GroupId) -> Result<Vec<InviteCode>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM invite_codes
         WHERE group_id = ?1 AND is_active = 1
         ORDER BY created_at DESC, rowid DESC"
    ))?;
    let rows = stmt
        .query_map([group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Soft-deactivate an invite.
pub fn deactivate(conn: &Connection, id: InviteId) -> Result<()> {
    conn.execute("UPDATE invite_codes SET is_active = 0 WHERE id = ?1", [id])?;
    Ok(())
}
