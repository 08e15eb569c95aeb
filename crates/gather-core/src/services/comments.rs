//! Passage comments. Any number per subject.

use gather_db::queries::comments;
use gather_types::{new_id, CommentBody, CommentId, GroupId, PassageId, StudyPassageComment};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_author, require_member};
use crate::materialize::ensure_group_session;
use crate::resolve::{self, require_group, EntityRef};
use crate::{validate, Actor, Entity, Result, ServiceError};

pub fn list_comments(
    conn: &Connection,
    passage_id: PassageId,
    group_id: GroupId,
) -> Result<Vec<StudyPassageComment>> {
    resolve::lineage(conn, EntityRef::Passage(passage_id))?;
    require_group(conn, group_id)?;
    Ok(comments::list(conn, passage_id, group_id)?)
}

pub fn create_comment(
    conn: &Connection,
    actor: &Actor,
    passage_id: PassageId,
    group_id: GroupId,
    body: &CommentBody,
) -> Result<StudyPassageComment> {
    validate::required("comment", &body.comment, None)?;

    let lineage = resolve::lineage(conn, EntityRef::Passage(passage_id))?;
    let session_id = lineage
        .session_id
        .ok_or(ServiceError::NotFound(Entity::Session))?;
    require_group(conn, group_id)?;
    require_member(conn, group_id, &actor.subject)?;

    let group_session = ensure_group_session(conn, group_id, session_id, actor.at)?;
    let comment = StudyPassageComment {
        id: new_id(),
        passage_id,
        group_id,
        group_session_id: group_session.id,
        user_sub: actor.subject.clone(),
        comment: body.comment.clone(),
        created_at: actor.at,
        updated_at: actor.at,
    };
    comments::insert(conn, &comment)?;

    info!(group_id = %group_id, subject = %actor.subject, comment_id = %comment.id, "comment created");
    Ok(comment)
}

pub fn update_comment(
    conn: &Connection,
    actor: &Actor,
    comment_id: CommentId,
    body: &CommentBody,
) -> Result<StudyPassageComment> {
    let existing = find(conn, comment_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    validate::required("comment", &body.comment, None)?;

    comments::update_text(conn, comment_id, &body.comment, actor.at)?;
    find(conn, comment_id)
}

pub fn delete_comment(conn: &Connection, actor: &Actor, comment_id: CommentId) -> Result<()> {
    let existing = find(conn, comment_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    comments::delete(conn, comment_id)?;

    info!(group_id = %existing.group_id, subject = %actor.subject, comment_id = %comment_id, "comment deleted");
    Ok(())
}

fn find(conn: &Connection, comment_id: CommentId) -> Result<StudyPassageComment> {
    comments::find(conn, comment_id)?.ok_or(ServiceError::NotFound(Entity::Comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn body(text: &str) -> CommentBody {
        CommentBody {
            comment: text.to_string(),
        }
    }

    #[test]
    fn test_many_comments_per_subject() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");

        create_comment(&conn, &bob, world.passage, world.group, &body("One")).expect("one");
        create_comment(&conn, &bob, world.passage, world.group, &body("Two")).expect("two");
        let listed = list_comments(&conn, world.passage, world.group).expect("list");
        let texts: Vec<_> = listed.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["One", "Two"]);
    }

    #[test]
    fn test_edit_by_author() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");
        let comment = create_comment(&conn, &bob, world.passage, world.group, &body("Draft"))
            .expect("create");

        let err = update_comment(&conn, &testing::leader(), comment.id, &body("Hijack"))
            .expect_err("not author");
        assert_eq!(err.status(), 403);

        let updated = update_comment(&conn, &bob, comment.id, &body("Final")).expect("update");
        assert_eq!(updated.comment, "Final");

        delete_comment(&conn, &bob, comment.id).expect("delete");
        assert!(matches!(
            update_comment(&conn, &bob, comment.id, &body("Late")),
            Err(ServiceError::NotFound(Entity::Comment))
        ));
    }

    #[test]
    fn test_blank_comment() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let err = create_comment(&conn, &testing::leader(), world.passage, world.group, &body(""))
            .expect_err("blank");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
