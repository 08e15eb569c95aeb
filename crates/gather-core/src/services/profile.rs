//! User profiles, created lazily on first access.

use gather_db::queries::users;
use gather_db::DbError;
use gather_types::{new_id, ProfileUpdate, UserProfile, DEFAULT_DISPLAY_NAME};
use rusqlite::Connection;
use tracing::info;

use crate::{validate, Actor, Entity, Result, ServiceError};

/// The actor's profile, created with the default display name if absent.
pub fn get_profile(conn: &Connection, actor: &Actor) -> Result<UserProfile> {
    if let Some(profile) = users::find_by_subject(conn, &actor.subject)? {
        return Ok(profile);
    }
    create(conn, actor, DEFAULT_DISPLAY_NAME)
}

/// Set the actor's display name, creating the profile if needed.
pub fn update_profile(conn: &Connection, actor: &Actor, update: &ProfileUpdate) -> Result<UserProfile> {
    let display_name = validate::display_name(&update.display_name)?;

    if users::update_display_name(conn, &actor.subject, &display_name, actor.at)? {
        return users::find_by_subject(conn, &actor.subject)?
            .ok_or(ServiceError::NotFound(Entity::User));
    }
    create(conn, actor, &display_name)
}

fn create(conn: &Connection, actor: &Actor, display_name: &str) -> Result<UserProfile> {
    let profile = UserProfile {
        id: new_id(),
        subject: actor.subject.clone(),
        display_name: display_name.to_string(),
        initials: UserProfile::initials_of(display_name),
        created_at: actor.at,
        updated_at: actor.at,
    };
    match users::insert(conn, &profile) {
        Ok(()) => {
            info!(subject = %actor.subject, "profile created");
            Ok(profile)
        }
        Err(DbError::Duplicate(_)) => users::find_by_subject(conn, &actor.subject)?
            .ok_or(ServiceError::NotFound(Entity::User)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_get_creates_default_once() {
        let conn = testing::db();
        let actor = Actor::new("alice", 10);

        let first = get_profile(&conn, &actor).expect("get");
        assert_eq!(first.display_name, "User");
        assert_eq!(first.initials, "U");
        let second = get_profile(&conn, &Actor::new("alice", 20)).expect("get again");
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_creates_or_updates() {
        let conn = testing::db();
        let actor = Actor::new("alice", 10);
        let update = ProfileUpdate {
            display_name: "  Mary Anne Smith ".to_string(),
        };

        let created = update_profile(&conn, &actor, &update).expect("create");
        assert_eq!(created.display_name, "Mary Anne Smith");
        assert_eq!(created.initials, "MS");

        let renamed = update_profile(
            &conn,
            &Actor::new("alice", 50),
            &ProfileUpdate {
                display_name: "Mary".to_string(),
            },
        )
        .expect("update");
        assert_eq!(renamed.id, created.id);
        assert_eq!(renamed.initials, "M");
        assert_eq!(renamed.updated_at, 50);
    }

    #[test]
    fn test_blank_name_rejected() {
        let conn = testing::db();
        let err = update_profile(
            &conn,
            &Actor::new("alice", 10),
            &ProfileUpdate {
                display_name: "   ".to_string(),
            },
        )
        .expect_err("blank");
        assert_eq!(err.status(), 422);
    }
}
