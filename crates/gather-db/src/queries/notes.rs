//! Session note query functions.

use gather_types::{GroupId, NoteId, SessionId, StudySessionNote};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str =
    "id, session_id, group_id, group_session_id, user_sub, note, created_at, updated_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudySessionNote> {
    Ok(StudySessionNote {
        id: row.get(0)?,
        session_id: row.get(1)?,
        group_id: row.get(2)?,
        group_session_id: row.get(3)?,
        user_sub: row.get(4)?,
        note: row.get(5)?,
        created_at: get_ts(row, 6)?,
        updated_at: get_ts(row, 7)?,
    })
}

pub fn insert(conn: &Connection, note: &StudySessionNote) -> Result<()> {
    conn.execute(
        "INSERT INTO study_session_notes
            (id, session_id, group_id, group_session_id, user_sub, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            note.id,
            note.session_id,
            note.group_id,
            note.group_session_id,
            note.user_sub,
            note.note,
            ts(note.created_at),
            ts(note.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: NoteId) -> Result<Option<StudySessionNote>> {
    let note = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_session_notes WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(note)
}

pub fn session_of(conn: &Connection, id: NoteId) -> Result<Option<SessionId>> {
    let session_id = conn
        .query_row(
            "SELECT session_id FROM study_session_notes WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(session_id)
}

pub fn list(
    conn: &Connection,
    session_id: SessionId,
    group_id: GroupId,
) -> Result<Vec<StudySessionNote>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_session_notes
         WHERE session_id = ?1 AND group_id = ?2
         ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![session_id, group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_text(conn: &Connection, id: NoteId, text: &str, now: u64) -> Result<()> {
    conn.execute(
        "UPDATE study_session_notes SET note = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, text, ts(now)],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: NoteId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_session_notes WHERE id = ?1", [id])?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn test_note_lifecycle() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let note = StudySessionNote {
            id: gather_types::new_id(),
            session_id: scope.session,
            group_id: scope.group,
            group_session_id: scope.group_session,
            user_sub: "alice".to_string(),
            note: "Bring snacks".to_string(),
            created_at: 1000,
            updated_at: 1000,
        };
        insert(&conn, &note).expect("insert");
        assert_eq!(session_of(&conn, note.id).expect("q"), Some(scope.session));

        update_text(&conn, note.id, "Bring coffee", 1200).expect("update");
        let listed = list(&conn, scope.session, scope.group).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].note, "Bring coffee");

        assert!(delete(&conn, note.id).expect("delete"));
        assert!(find(&conn, note.id).expect("find").is_none());
    }

    #[test]
    fn test_deleting_group_removes_notes() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let note = StudySessionNote {
            id: gather_types::new_id(),
            session_id: scope.session,
            group_id: scope.group,
            group_session_id: scope.group_session,
            user_sub: "alice".to_string(),
            note: "x".to_string(),
            created_at: 1000,
            updated_at: 1000,
        };
        insert(&conn, &note).expect("insert");

        crate::queries::groups::delete(&conn, scope.group).expect("delete group");
        assert!(find(&conn, note.id).expect("find").is_none());
    }
}
