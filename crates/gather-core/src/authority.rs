//! Membership and role checks. Every call is a fresh lookup.

use gather_db::queries::members;
use gather_types::{GroupId, GroupRole};
use rusqlite::Connection;

use crate::resolve::{self, EntityRef, Lineage};
use crate::{Denial, Result, ServiceError};

pub fn is_member(conn: &Connection, group_id: GroupId, subject: &str) -> Result<bool> {
    Ok(members::exists(conn, group_id, subject, None)?)
}

pub fn is_leader(conn: &Connection, group_id: GroupId, subject: &str) -> Result<bool> {
    Ok(members::exists(conn, group_id, subject, Some(GroupRole::Leader))?)
}

pub fn require_member(conn: &Connection, group_id: GroupId, subject: &str) -> Result<()> {
    if is_member(conn, group_id, subject)? {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(Denial::MembershipRequired))
    }
}

pub fn require_leader(conn: &Connection, group_id: GroupId, subject: &str) -> Result<()> {
    if is_leader(conn, group_id, subject)? {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(Denial::LeaderRequired))
    }
}

/// Resolve `entity` to its group, then require `subject` to lead it.
/// Resolution failures win over the role check.
pub fn require_leader_of(conn: &Connection, entity: EntityRef, subject: &str) -> Result<Lineage> {
    let lineage = resolve::lineage(conn, entity)?;
    require_leader(conn, lineage.group_id, subject)?;
    Ok(lineage)
}

pub fn require_author(author: &str, subject: &str) -> Result<()> {
    if author == subject {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(Denial::AuthorRequired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Entity};

    #[test]
    fn test_roles() {
        let conn = testing::db();
        let world = testing::world(&conn);
        testing::join(&conn, world.group, "member");

        assert!(is_leader(&conn, world.group, testing::LEADER).expect("q"));
        assert!(is_member(&conn, world.group, testing::LEADER).expect("q"));
        assert!(is_member(&conn, world.group, "member").expect("q"));
        assert!(!is_leader(&conn, world.group, "member").expect("q"));
        assert!(!is_member(&conn, world.group, "stranger").expect("q"));
    }

    #[test]
    fn test_leadership_does_not_carry_across_groups() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let other = testing::group(&conn, "someone-else");

        let err = require_member(&conn, other, testing::LEADER).expect_err("not member");
        assert!(matches!(err, ServiceError::Forbidden(Denial::MembershipRequired)));
    }

    #[test]
    fn test_not_found_before_forbidden() {
        let conn = testing::db();
        testing::world(&conn);

        let err = require_leader_of(&conn, EntityRef::Study(gather_types::new_id()), "stranger")
            .expect_err("missing study");
        assert!(matches!(err, ServiceError::NotFound(Entity::Study)));
    }

    #[test]
    fn test_require_author() {
        assert!(require_author("alice", "alice").is_ok());
        let err = require_author("alice", "bob").expect_err("not author");
        assert_eq!(err.status(), 403);
    }
}
