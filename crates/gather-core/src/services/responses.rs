//! Question responses, scoped to a caller-supplied group.
//!
//! Unlike likes, a second top-level response by the same subject in the
//! same (question, group) is rejected with `duplicate_response` rather than
//! returning the first one.

use gather_db::queries::responses;
use gather_db::DbError;
use gather_types::{
    new_id, GroupId, NewResponse, QuestionId, ResponseBody, ResponseId, StudyQuestionResponse,
};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_author, require_member};
use crate::materialize::ensure_group_session;
use crate::resolve::{self, require_group, EntityRef};
use crate::{validate, Actor, Conflict, Entity, Result, ServiceError};

pub fn list_responses(
    conn: &Connection,
    question_id: QuestionId,
    group_id: GroupId,
) -> Result<Vec<StudyQuestionResponse>> {
    resolve::lineage(conn, EntityRef::Question(question_id))?;
    require_group(conn, group_id)?;
    Ok(responses::list(conn, question_id, group_id)?)
}

pub fn create_response(
    conn: &Connection,
    actor: &Actor,
    question_id: QuestionId,
    group_id: GroupId,
    new: &NewResponse,
) -> Result<StudyQuestionResponse> {
    validate::required("response", &new.response, None)?;

    let lineage = resolve::lineage(conn, EntityRef::Question(question_id))?;
    let session_id = lineage
        .session_id
        .ok_or(ServiceError::NotFound(Entity::Session))?;
    require_group(conn, group_id)?;
    if let Some(parent_id) = new.parent_response_id {
        let parent = responses::find(conn, parent_id)?
            .filter(|p| p.question_id == question_id && p.group_id == group_id);
        if parent.is_none() {
            return Err(ServiceError::NotFound(Entity::ParentResponse));
        }
    }
    require_member(conn, group_id, &actor.subject)?;

    let group_session = ensure_group_session(conn, group_id, session_id, actor.at)?;
    let response = StudyQuestionResponse {
        id: new_id(),
        question_id,
        group_id,
        group_session_id: group_session.id,
        parent_response_id: new.parent_response_id,
        user_sub: actor.subject.clone(),
        response: new.response.clone(),
        created_at: actor.at,
        updated_at: actor.at,
    };
    match responses::insert(conn, &response) {
        Ok(()) => {}
        Err(DbError::Duplicate(_)) => {
            return Err(ServiceError::Conflict(Conflict::DuplicateResponse));
        }
        Err(e) => return Err(e.into()),
    }

    info!(group_id = %group_id, subject = %actor.subject, response_id = %response.id, "response created");
    Ok(response)
}

pub fn update_response(
    conn: &Connection,
    actor: &Actor,
    response_id: ResponseId,
    body: &ResponseBody,
) -> Result<StudyQuestionResponse> {
    let existing = find(conn, response_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    validate::required("response", &body.response, None)?;

    responses::update_text(conn, response_id, &body.response, actor.at)?;
    find(conn, response_id)
}

pub fn delete_response(conn: &Connection, actor: &Actor, response_id: ResponseId) -> Result<()> {
    let existing = find(conn, response_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    responses::delete(conn, response_id)?;

    info!(group_id = %existing.group_id, subject = %actor.subject, response_id = %response_id, "response deleted");
    Ok(())
}

fn find(conn: &Connection, response_id: ResponseId) -> Result<StudyQuestionResponse> {
    responses::find(conn, response_id)?.ok_or(ServiceError::NotFound(Entity::Response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Denial};
    use gather_db::queries::links;

    fn body(text: &str, parent: Option<ResponseId>) -> NewResponse {
        NewResponse {
            response: text.to_string(),
            parent_response_id: parent,
        }
    }

    #[test]
    fn test_second_top_level_response_conflicts() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");

        let first = create_response(&conn, &bob, world.question, world.group, &body("Yes", None))
            .expect("create");
        assert_eq!(first.parent_response_id, None);

        let err = create_response(&conn, &bob, world.question, world.group, &body("Again", None))
            .expect_err("duplicate");
        assert!(matches!(err, ServiceError::Conflict(Conflict::DuplicateResponse)));
        assert_eq!(err.status(), 409);
        assert_eq!(list_responses(&conn, world.question, world.group).expect("list").len(), 1);
    }

    #[test]
    fn test_records_group_session() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let response = create_response(
            &conn,
            &testing::leader(),
            world.question,
            world.group,
            &body("Grace", None),
        )
        .expect("create");

        let group_study = links::find_group_study(&conn, world.group, world.study)
            .expect("find")
            .expect("materialized");
        let group_session = links::find_group_session(&conn, group_study.id, world.session)
            .expect("find")
            .expect("materialized");
        assert_eq!(response.group_session_id, group_session.id);
    }

    #[test]
    fn test_replies() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");
        let top = create_response(&conn, &bob, world.question, world.group, &body("Top", None))
            .expect("top");

        let reply = create_response(
            &conn,
            &testing::leader(),
            world.question,
            world.group,
            &body("Reply", Some(top.id)),
        )
        .expect("reply");
        assert_eq!(reply.parent_response_id, Some(top.id));

        let err = create_response(
            &conn,
            &testing::leader(),
            world.question,
            world.group,
            &body("Orphan", Some(gather_types::new_id())),
        )
        .expect_err("missing parent");
        assert_eq!(err.discriminator(), "parent_response_not_found");
    }

    #[test]
    fn test_parent_from_other_group_is_not_found() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let guest_group = testing::group(&conn, "guest");
        let guest = testing::join(&conn, guest_group, "guest");
        let home = create_response(
            &conn,
            &testing::leader(),
            world.question,
            world.group,
            &body("Home", None),
        )
        .expect("home");

        let err = create_response(
            &conn,
            &guest,
            world.question,
            guest_group,
            &body("Cross", Some(home.id)),
        )
        .expect_err("foreign parent");
        assert!(matches!(err, ServiceError::NotFound(Entity::ParentResponse)));
    }

    #[test]
    fn test_membership_checked_against_supplied_group() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let other = testing::group(&conn, "other");

        let err = create_response(&conn, &testing::leader(), world.question, other, &body("x", None))
            .expect_err("not member of supplied group");
        assert!(matches!(err, ServiceError::Forbidden(Denial::MembershipRequired)));

        let err = create_response(
            &conn,
            &Actor::new("stranger", 1),
            gather_types::new_id(),
            world.group,
            &body("x", None),
        )
        .expect_err("missing question");
        assert!(matches!(err, ServiceError::NotFound(Entity::Question)));
    }

    #[test]
    fn test_author_only_edits() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");
        let response = create_response(&conn, &bob, world.question, world.group, &body("v1", None))
            .expect("create");

        let edit = ResponseBody {
            response: "v2".to_string(),
        };
        let err = update_response(&conn, &testing::leader(), response.id, &edit)
            .expect_err("not author");
        assert!(matches!(err, ServiceError::Forbidden(Denial::AuthorRequired)));

        let later = Actor::new("bob", 7000);
        let updated = update_response(&conn, &later, response.id, &edit).expect("update");
        assert_eq!(updated.response, "v2");
        assert_eq!(updated.updated_at, 7000);

        assert_eq!(
            delete_response(&conn, &testing::leader(), response.id)
                .expect_err("not author")
                .status(),
            403
        );
        delete_response(&conn, &bob, response.id).expect("delete");
        let err = delete_response(&conn, &bob, response.id).expect_err("gone");
        assert!(matches!(err, ServiceError::NotFound(Entity::Response)));
    }
}
