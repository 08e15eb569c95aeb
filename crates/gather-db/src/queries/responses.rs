//! Question response query functions.

use gather_types::{GroupId, QuestionId, ResponseId, StudyQuestionResponse};
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

const COLUMNS: &str = "id, question_id, group_id, group_session_id, parent_response_id, \
                       user_sub, response, created_at, updated_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudyQuestionResponse> {
    Ok(StudyQuestionResponse {
        id: row.get(0)?,
        question_id: row.get(1)?,
        group_id: row.get(2)?,
        group_session_id: row.get(3)?,
        parent_response_id: row.get(4)?,
        user_sub: row.get(5)?,
        response: row.get(6)?,
        created_at: get_ts(row, 7)?,
        updated_at: get_ts(row, 8)?,
    })
}

/// Insert a response. One response per (question, group, user, parent);
/// a second attempt fails with `Duplicate`.
pub fn insert(conn: &Connection, response: &StudyQuestionResponse) -> Result<()> {
    conn.execute(
        "INSERT INTO study_question_responses
            (id, question_id, group_id, group_session_id, parent_response_id,
             user_sub, response, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            response.id,
            response.question_id,
            response.group_id,
            response.group_session_id,
            response.parent_response_id,
            response.user_sub,
            response.response,
            ts(response.created_at),
            ts(response.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: ResponseId) -> Result<Option<StudyQuestionResponse>> {
    let response = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM study_question_responses WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(response)
}

/// Question a response answers, if the response exists.
pub fn question_of(conn: &Connection, id: ResponseId) -> Result<Option<QuestionId>> {
    let question_id = conn
        .query_row(
            "SELECT question_id FROM study_question_responses WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(question_id)
}

/// Responses to a question within one group, oldest first.
pub fn list(
    conn: &Connection,
    question_id: QuestionId,
    group_id: GroupId,
) -> Result<Vec<StudyQuestionResponse>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM study_question_responses
         WHERE question_id = ?1 AND group_id = ?2
         ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map(rusqlite::params![question_id, group_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn update_text(conn: &Connection, id: ResponseId, text: &str, now: u64) -> Result<()> {
    conn.execute(
        "UPDATE study_question_responses SET response = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, text, ts(now)],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: ResponseId) -> Result<bool> {
    let n = conn.execute("DELETE FROM study_question_responses WHERE id = ?1", [id])?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;
    use gather_types::{new_id, GroupSessionId};

    fn response(
        question_id: QuestionId,
        group_id: GroupId,
        group_session_id: GroupSessionId,
        parent: Option<ResponseId>,
        sub: &str,
    ) -> StudyQuestionResponse {
        StudyQuestionResponse {
            id: new_id(),
            question_id,
            group_id,
            group_session_id,
            parent_response_id: parent,
            user_sub: sub.to_string(),
            response: "Grace first".to_string(),
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_one_top_level_response_per_user() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let question = fixtures::question(&conn, scope.session, 1);

        let first = response(question, scope.group, scope.group_session, None, "alice");
        insert(&conn, &first).expect("insert");

        let second = response(question, scope.group, scope.group_session, None, "alice");
        assert!(insert(&conn, &second).expect_err("dup").is_duplicate());

        // A reply under the first response is a different slot.
        let reply = response(question, scope.group, scope.group_session, Some(first.id), "alice");
        insert(&conn, &reply).expect("reply");

        let other = response(question, scope.group, scope.group_session, None, "bob");
        insert(&conn, &other).expect("other user");

        assert_eq!(list(&conn, question, scope.group).expect("list").len(), 3);
        assert_eq!(question_of(&conn, reply.id).expect("q"), Some(question));
    }

    #[test]
    fn test_update_text_and_cascade() {
        let conn = fixtures::db();
        let scope = fixtures::scope(&conn);
        let question = fixtures::question(&conn, scope.session, 1);
        let parent = response(question, scope.group, scope.group_session, None, "alice");
        insert(&conn, &parent).expect("insert");
        let reply = response(question, scope.group, scope.group_session, Some(parent.id), "bob");
        insert(&conn, &reply).expect("reply");

        update_text(&conn, parent.id, "Edited", 2000).expect("update");
        let stored = find(&conn, parent.id).expect("find").expect("present");
        assert_eq!(stored.response, "Edited");
        assert_eq!(stored.updated_at, 2000);
        assert_eq!(stored.created_at, 1000);

        assert!(delete(&conn, parent.id).expect("delete"));
        assert!(find(&conn, reply.id).expect("find").is_none());
    }
}
