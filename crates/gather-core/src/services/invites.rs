//! Invite codes: creation, redemption and revocation.
//!
//! A code is 16 random bytes encoded as URL-safe base64 without padding.
//! Codes stay redeemable by any number of subjects until deactivated or
//! past their expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use gather_db::queries::{groups, invites};
use gather_types::{
    new_id, Group, GroupId, GroupMember, InviteCode, InviteLink, NewInvite, SECS_PER_DAY,
};
use rand::RngCore;
use rusqlite::Connection;
use tracing::info;

use crate::authority::{is_leader, require_leader};
use crate::services::groups::{add_member, get_group};
use crate::{Actor, Conflict, Denial, Entity, Result, ServiceError};

/// Size of the random part of an invite code.
pub const CODE_BYTES: usize = 16;

/// Generate a fresh, URL-safe invite code.
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Shareable link for a code under `base_url`.
pub fn link_for(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

/// Create an invite for a group the actor leads.
///
/// `expires_in_days` of `None` never expires; `Some(0)` expires at the
/// creation instant.
pub fn create_invite(
    conn: &Connection,
    actor: &Actor,
    group_id: GroupId,
    new: &NewInvite,
    base_url: &str,
) -> Result<InviteLink> {
    let group = get_group(conn, group_id)?;
    require_leader(conn, group_id, &actor.subject)?;

    let invite = InviteCode {
        id: new_id(),
        code: generate_code(),
        group_id,
        created_by: actor.subject.clone(),
        created_at: actor.at,
        expires_at: new
            .expires_in_days
            .map(|days| actor.at.saturating_add(u64::from(days) * SECS_PER_DAY)),
        is_active: true,
    };
    invites::insert(conn, &invite)?;

    info!(group_id = %group_id, subject = %actor.subject, invite_id = %invite.id, "invite created");
    Ok(InviteLink {
        link: link_for(base_url, &invite.code),
        code: invite.code,
        group_id,
        group_name: group.name,
    })
}

/// Active invites of a group, newest first. Leader only.
pub fn list_invites(conn: &Connection, actor: &Actor, group_id: GroupId) -> Result<Vec<InviteCode>> {
    crate::resolve::require_group(conn, group_id)?;
    require_leader(conn, group_id, &actor.subject)?;
    Ok(invites::list_active(conn, group_id)?)
}

/// The group an invite points to.
pub fn preview_invite(conn: &Connection, code: &str) -> Result<Group> {
    let invite = find(conn, code)?;
    groups::find(conn, invite.group_id)?.ok_or(ServiceError::NotFound(Entity::Group))
}

/// Redeem an invite. A subject that already belongs to the group gets its
/// existing membership back.
pub fn join_by_invite(conn: &Connection, actor: &Actor, code: &str) -> Result<GroupMember> {
    let invite = find(conn, code)?;
    if !invite.is_active {
        return Err(ServiceError::Conflict(Conflict::InviteInactive));
    }
    if invite.is_expired(actor.at) {
        return Err(ServiceError::Conflict(Conflict::InviteExpired));
    }
    add_member(conn, actor, invite.group_id)
}

/// Deactivate an invite. Allowed for its creator or any leader of the group.
pub fn revoke_invite(conn: &Connection, actor: &Actor, code: &str) -> Result<()> {
    let invite = find(conn, code)?;
    let allowed = invite.created_by == actor.subject
        || is_leader(conn, invite.group_id, &actor.subject)?;
    if !allowed {
        return Err(ServiceError::Forbidden(Denial::InviteRevocation));
    }
    invites::deactivate(conn, invite.id)?;

    info!(group_id = %invite.group_id, subject = %actor.subject, invite_id = %invite.id, "invite revoked");
    Ok(())
}

fn find(conn: &Connection, code: &str) -> Result<InviteCode> {
    invites::find_by_code(conn, code)?.ok_or(ServiceError::NotFound(Entity::Invite))
}
