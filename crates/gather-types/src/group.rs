//! Groups, memberships and invite codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GroupId, InviteId, MemberId, Subject};

/// A named collection of users; the top-level tenant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Group {
    #[ts(type = "string")]
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: u64,
}

/// Role a subject holds inside one group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Member,
    Leader,
}

impl GroupRole {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupRole::Member => "member",
            GroupRole::Leader => "leader",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored role string is not one of the known roles.
#[derive(Debug, thiserror::Error)]
#[error("unknown group role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for GroupRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(GroupRole::Member),
            "leader" => Ok(GroupRole::Leader),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Membership row, unique per `(group_id, user_sub)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct GroupMember {
    #[ts(type = "string")]
    pub id: MemberId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    pub user_sub: Subject,
    pub role: GroupRole,
    pub created_at: u64,
}

/// Invite code granting membership to one group.
///
/// `expires_at: None` means the code never expires. Deactivation is soft:
/// the row stays, `is_active` flips to false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct InviteCode {
    #[ts(type = "string")]
    pub id: InviteId,
    pub code: String,
    #[ts(type = "string")]
    pub group_id: GroupId,
    pub created_by: Subject,
    pub created_at: u64,
    pub expires_at: Option<u64>,
    pub is_active: bool,
}

impl InviteCode {
    /// Whether the code is past its expiry at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Shareable form of a freshly created invite.
#[derive(Clone, Debug, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct InviteLink {
    pub code: String,
    pub link: String,
    #[ts(type = "string")]
    pub group_id: GroupId,
    pub group_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewInvite {
    /// `None` creates a code that never expires.
    #[serde(default)]
    pub expires_in_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("leader".parse::<GroupRole>().expect("parse"), GroupRole::Leader);
        assert_eq!(GroupRole::Member.as_str(), "member");
        assert!("owner".parse::<GroupRole>().is_err());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&GroupRole::Leader).expect("serialize");
        assert_eq!(json, "\"leader\"");
    }

    #[test]
    fn test_invite_expiry() {
        let invite = InviteCode {
            id: crate::new_id(),
            code: "abc".to_string(),
            group_id: crate::new_id(),
            created_by: "alice".to_string(),
            created_at: 100,
            expires_at: Some(200),
            is_active: true,
        };
        assert!(!invite.is_expired(199));
        assert!(invite.is_expired(200));

        let forever = InviteCode {
            expires_at: None,
            ..invite
        };
        assert!(!forever.is_expired(u64::MAX));
    }
}
