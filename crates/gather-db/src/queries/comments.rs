//! Passage comment query functions.

use gather_types::{CommentId, GroupId, PassageId, StudyPassageComment};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str =
    "id, passage_id, group_id, group_session_id, user_sub, comment, created_at, updated_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyPassageComment> {
    Ok(StudyPassageComment {
        id: row.get(0)?,
        passage_id: row.get(1)?,
        group_id: row.get(2)?,
        group_session_id: row.get(3)?,
        user_sub: row.get(4)?,
        comment: row.get(5)?,
        created_at: get_ts(row, 6)?,
        updated_at: get_ts(row, 7)?,
    })
}

pub fn insert(conn: &Connection, comment: &StudyPassageComment) -> Result<()> {
    conn.execute(
        "INSERT INTO study_passage_comments
            (id, passage_id, group_id, group_session_id, user_sub, comment, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            comment.id,
            comment.passage_id,
            comment.group_id,
            comment.group_session_id,
            comment.user_sub,
            comment.comment,
            ts(comment.created_at),
            ts(comment.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: CommentId) -> Result<Option<StudyPassageComment>> {
    let comment = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_passage_comments WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(comment)
}

pub fn passage_of(conn: &Connection, id: CommentId) -> Result<Option<PassageId>> {
    let passage_id = conn
        .query_row(
            "SELECT passage_id FROM study_passage_comments WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(passage_id)
}

pub fn list(
    conn: &Connection,
    passage_id: PassageId,
    group_id: GroupId,
) -> Result<Vec<StudyPassageComment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_passage_comments
         WHERE passage_id = ?1 AND group_id = ?2
         ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![passage_id, group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_text(conn: &Connection, id: CommentId, text: &str, now: u64) -> Result<()> {
    conn.execute(
        "UPDATE study_passage_comments SET comment = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, text, ts(now)],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: CommentId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_passage_comments WHERE id = ?1", [id])?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn test_comments_scoped_by_group() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let passage = fixtures::passage(&conn, scope.session);

        for sub in ["alice", "alice", "bob"] {
            let comment = StudyPassageComment {
                id: gather_types::new_id(),
                passage_id: passage,
                group_id: scope.group,
                group_session_id: scope.group_session,
                user_sub: sub.to_string(),
                comment: "Amen".to_string(),
                created_at: 1000,
                updated_at: 1000,
            };
            insert(&conn, &comment).expect("insert");
        }

        let stranger = fixtures::group(&conn, "other");
        assert_eq!(list(&conn, passage, scope.group).expect("list").len(), 3);
        assert!(list(&conn, passage, stranger).expect("list").is_empty());
    }

    #[test]
    fn test_update_text() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let passage = fixtures::passage(&conn, scope.session);
        let comment = StudyPassageComment {
            id: gather_types::new_id(),
            passage_id: passage,
            group_id: scope.group,
            group_session_id: scope.group_session,
            user_sub: "alice".to_string(),
            comment: "First".to_string(),
            created_at: 1000,
            updated_at: 1000,
        };
        insert(&conn, &comment).expect("insert");

        update_text(&conn, comment.id, "Second", 1500).expect("update");
        let stored = find(&conn, comment.id).expect("find").expect("present");
        assert_eq!(stored.comment, "Second");
        assert_eq!(stored.updated_at, 1500);
        assert_eq!(passage_of(&conn, comment.id).expect("q"), Some(passage));
    }
}
