//! Passage likes. Liking twice returns the existing like.

use gather_db::queries::likes;
use gather_db::DbError;
use gather_types::{new_id, GroupId, LikeId, PassageId, StudyPassageLike};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_author, require_member};
use crate::materialize::ensure_group_session;
use crate::resolve::{self, require_group, EntityRef};
use crate::{Actor, Entity, Result, ServiceError};

pub fn list_likes(
    conn: &Connection,
    passage_id: PassageId,
    group_id: GroupId,
) -> Result<Vec<StudyPassageLike>> {
    resolve::lineage(conn, EntityRef::Passage(passage_id))?;
    require_group(conn, group_id)?;
    Ok(likes::list(conn, passage_id, group_id)?)
}

pub fn create_like(
    conn: &Connection,
    actor: &Actor,
    passage_id: PassageId,
    group_id: GroupId,
) -> Result<StudyPassageLike> {
    let lineage = resolve::lineage(conn, EntityRef::Passage(passage_id))?;
    let session_id = lineage
        .session_id
        .ok_or(ServiceError::NotFound(Entity::Session))?;
    require_group(conn, group_id)?;
    require_member(conn, group_id, &actor.subject)?;

    if let Some(existing) = likes::find_by_scope(conn, passage_id, group_id, &actor.subject)? {
        return Ok(existing);
    }

    let group_session = ensure_group_session(conn, group_id, session_id, actor.at)?;
    let like = StudyPassageLike {
        id: new_id(),
        passage_id,
        group_id,
        group_session_id: group_session.id,
        user_sub: actor.subject.clone(),
        created_at: actor.at,
    };
    match likes::insert(conn, &like) {
        Ok(()) => {
            info!(group_id = %group_id, subject = %actor.subject, like_id = %like.id, "passage liked");
            Ok(like)
        }
        Err(DbError::Duplicate(_)) => likes::find_by_scope(conn, passage_id, group_id, &actor.subject)?
            .ok_or(ServiceError::NotFound(Entity::Like)),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_like(conn: &Connection, actor: &Actor, like_id: LikeId) -> Result<()> {
    let like = likes::find(conn, like_id)?.ok_or(ServiceError::NotFound(Entity::Like))?;
    require_author(&like.user_sub, &actor.subject)?;
    likes::delete(conn, like_id)?;

    info!(group_id = %like.group_id, subject = %actor.subject, like_id = %like_id, "like removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Denial};

    #[test]
    fn test_like_twice_returns_same_row() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");

        let first = create_like(&conn, &bob, world.passage, world.group).expect("like");
        let second = create_like(&conn, &Actor::new("bob", 99_999), world.passage, world.group)
            .expect("like again");
        assert_eq!(first, second);
        assert_eq!(list_likes(&conn, world.passage, world.group).expect("list").len(), 1);
    }

    #[test]
    fn test_guest_group_engages_with_shared_content() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let guest_group = testing::group(&conn, "guest");
        let guest = testing::join(&conn, guest_group, "guest");

        let like = create_like(&conn, &guest, world.passage, guest_group).expect("like");
        assert_eq!(like.group_id, guest_group);
        assert!(list_likes(&conn, world.passage, world.group).expect("list").is_empty());
    }

    #[test]
    fn test_ordering_of_failures() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let stranger = Actor::new("stranger", 1);

        let err = create_like(&conn, &stranger, gather_types::new_id(), world.group)
            .expect_err("missing passage");
        assert!(matches!(err, ServiceError::NotFound(Entity::Passage)));

        let err = create_like(&conn, &stranger, world.passage, gather_types::new_id())
            .expect_err("missing group");
        assert!(matches!(err, ServiceError::NotFound(Entity::Group)));

        let err = create_like(&conn, &stranger, world.passage, world.group).expect_err("stranger");
        assert!(matches!(err, ServiceError::Forbidden(Denial::MembershipRequired)));
    }

    #[test]
    fn test_unlike_author_only() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");
        let like = create_like(&conn, &bob, world.passage, world.group).expect("like");

        let err = delete_like(&conn, &testing::leader(), like.id).expect_err("not author");
        assert_eq!(err.discriminator(), "not_author");
        delete_like(&conn, &bob, like.id).expect("unlike");
        assert_eq!(
            delete_like(&conn, &bob, like.id).expect_err("gone").discriminator(),
            "like_not_found"
        );
    }
}
