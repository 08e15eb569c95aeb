//! Groups and memberships.

use gather_db::queries::{groups, members};
use gather_db::DbError;
use gather_types::{new_id, Group, GroupId, GroupMember, GroupRole, NewGroup};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_leader, require_member};
use crate::resolve::require_group;
use crate::validate::{self, GROUP_NAME_MAX};
use crate::{Actor, Entity, Result, ServiceError};

/// All groups, newest first.
pub fn list_groups(conn: &Connection) -> Result<Vec<Group>> {
    Ok(groups::list(conn)?)
}

/// Groups the actor belongs to, newest first.
pub fn list_my_groups(conn: &Connection, actor: &Actor) -> Result<Vec<Group>> {
    Ok(groups::list_for_subject(conn, &actor.subject)?)
}

pub fn get_group(conn: &Connection, group_id: GroupId) -> Result<Group> {
    groups::find(conn, group_id)?.ok_or(ServiceError::NotFound(Entity::Group))
}

/// Create a group; the actor becomes its leader in the same transaction.
pub fn create_group(conn: &Connection, actor: &Actor, new: &NewGroup) -> Result<Group> {
    validate::required("name", &new.name, Some(GROUP_NAME_MAX))?;

    let group = Group {
        id: new_id(),
        name: new.name.clone(),
        description: new.description.clone(),
        created_at: actor.at,
    };
    groups::insert(conn, &group)?;
    members::insert(
        conn,
        &GroupMember {
            id: new_id(),
            group_id: group.id,
            user_sub: actor.subject.clone(),
            role: GroupRole::Leader,
            created_at: actor.at,
        },
    )?;

    info!(group_id = %group.id, subject = %actor.subject, "group created");
    Ok(group)
}

/// Join a group as a member. Joining again returns the existing membership.
pub fn join_group(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<GroupMember> {
    require_group(conn, group_id)?;
    add_member(conn, actor, group_id)
}

/// Remove the actor's own membership.
pub fn leave_group(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<()> {
    require_group(conn, group_id)?;
    let member = members::find(conn, group_id, &actor.subject)?
        .ok_or(ServiceError::NotFound(Entity::Membership))?;
    members::delete(conn, member.id)?;

    info!(group_id = %group_id, subject = %actor.subject, "left group");
    Ok(())
}

pub fn list_members(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<Vec<GroupMember>> {
    require_group(conn, group_id)?;
    require_member(conn, group_id, &actor.subject)?;
    Ok(members::list(conn, group_id)?)
}

/// Delete a group and everything beneath it. Leader only.
pub fn delete_group(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<()> {
    require_group(conn, group_id)?;
    require_leader(conn, group_id, &actor.subject)?;
    groups::delete(conn, group_id)?;

    info!(group_id = %group_id, subject = %actor.subject, "group deleted");
    Ok(())
}

/// Get-or-create a plain membership for the actor. The group must exist.
pub(crate) fn add_member(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<GroupMember> {
    if let Some(existing) = members::find(conn, group_id, &actor.subject)? {
        return Ok(existing);
    }

    let member = GroupMember {
        id: new_id(),
        group_id,
        user_sub: actor.subject.clone(),
        role: GroupRole::Member,
        created_at: actor.at,
    };
    match members::insert(conn, &member) {
        Ok(()) => {
            info!(group_id = %group_id, subject = %actor.subject, "joined group");
            Ok(member)
        }
        Err(DbError::Duplicate(_)) => members::find(conn, group_id, &actor.subject)?
            .ok_or(ServiceError::NotFound(Entity::Membership)),
        Err(e) => Err(e.into()),
    }
}
