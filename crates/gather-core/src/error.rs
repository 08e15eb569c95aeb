//! Closed error taxonomy for service operations.
//!
//! Each variant carries a stable discriminator (`session_not_found`,
//! `invite_expired`, ...) for machine consumers, a user-facing detail
//! message, and an HTTP-equivalent status code.

use std::fmt;

use gather_db::DbError;

/// The link of an ownership chain (or the target itself) that was missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Group,
    Membership,
    Invite,
    Study,
    Session,
    Passage,
    Question,
    Response,
    ParentResponse,
    Like,
    Comment,
    Note,
    User,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Group => "group",
            Entity::Membership => "membership",
            Entity::Invite => "invite",
            Entity::Study => "study",
            Entity::Session => "session",
            Entity::Passage => "passage",
            Entity::Question => "question",
            Entity::Response => "response",
            Entity::ParentResponse => "parent_response",
            Entity::Like => "like",
            Entity::Comment => "comment",
            Entity::Note => "note",
            Entity::User => "user",
        }
    }

    fn not_found_reason(self) -> &'static str {
        match self {
            Entity::Group => "group_not_found",
            Entity::Membership => "membership_not_found",
            Entity::Invite => "invite_not_found",
            Entity::Study => "study_not_found",
            Entity::Session => "session_not_found",
            Entity::Passage => "passage_not_found",
            Entity::Question => "question_not_found",
            Entity::Response => "response_not_found",
            Entity::ParentResponse => "parent_response_not_found",
            Entity::Like => "like_not_found",
            Entity::Comment => "comment_not_found",
            Entity::Note => "note_not_found",
            Entity::User => "user_not_found",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Entity::Group => "Group",
            Entity::Membership => "Membership",
            Entity::Invite => "Invite code",
            Entity::Study => "Study",
            Entity::Session => "Session",
            Entity::Passage => "Passage",
            Entity::Question => "Question",
            Entity::Response => "Response",
            Entity::ParentResponse => "Parent response",
            Entity::Like => "Like",
            Entity::Comment => "Comment",
            Entity::Note => "Note",
            Entity::User => "User",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an existing actor was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Denial {
    LeaderRequired,
    MembershipRequired,
    AuthorRequired,
    /// Only the invite's creator or a group leader may revoke it.
    InviteRevocation,
}

impl Denial {
    pub fn as_str(self) -> &'static str {
        match self {
            Denial::LeaderRequired => "not_leader",
            Denial::MembershipRequired => "not_member",
            Denial::AuthorRequired => "not_author",
            Denial::InviteRevocation => "not_authorized",
        }
    }

    fn detail(self) -> &'static str {
        match self {
            Denial::LeaderRequired => "Only group leaders can do this",
            Denial::MembershipRequired => "Only group members can do this",
            Denial::AuthorRequired => "Only the author can change this",
            Denial::InviteRevocation => "Not authorized to revoke this invite",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed request that the current state rejects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conflict {
    InviteInactive,
    InviteExpired,
    /// The subject already responded in this (question, group, parent) slot.
    DuplicateResponse,
    /// Another session of the study already holds the position.
    PositionTaken,
}

impl Conflict {
    pub fn as_str(self) -> &'static str {
        match self {
            Conflict::InviteInactive => "invite_inactive",
            Conflict::InviteExpired => "invite_expired",
            Conflict::DuplicateResponse => "duplicate_response",
            Conflict::PositionTaken => "position_taken",
        }
    }

    fn detail(self) -> &'static str {
        match self {
            Conflict::InviteInactive => "This invite link is no longer active",
            Conflict::InviteExpired => "This invite link has expired",
            Conflict::DuplicateResponse => "You have already responded here",
            Conflict::PositionTaken => "Another session already uses this position",
        }
    }

    fn status(self) -> u16 {
        match self {
            Conflict::InviteInactive | Conflict::InviteExpired => 400,
            Conflict::DuplicateResponse | Conflict::PositionTaken => 409,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required entity or ancestor is absent.
    #[error("{0} not found")]
    NotFound(Entity),

    /// The entity exists but the actor lacks the required role or authorship.
    #[error("forbidden: {0}")]
    Forbidden(Denial),

    #[error("conflict: {0}")]
    Conflict(Conflict),

    /// Input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Stable machine-readable reason.
    pub fn discriminator(&self) -> &'static str {
        match self {
            ServiceError::NotFound(entity) => entity.not_found_reason(),
            ServiceError::Forbidden(denial) => denial.as_str(),
            ServiceError::Conflict(conflict) => conflict.as_str(),
            ServiceError::Invalid(_) => "invalid_input",
            ServiceError::Db(_) => "internal",
        }
    }

    /// Message suitable for showing to the end user.
    pub fn detail(&self) -> String {
        match self {
            ServiceError::NotFound(entity) => format!("{} not found", entity.label()),
            ServiceError::Forbidden(denial) => denial.detail().to_string(),
            ServiceError::Conflict(conflict) => conflict.detail().to_string(),
            ServiceError::Invalid(message) => message.clone(),
            ServiceError::Db(_) => "Internal error".to_string(),
        }
    }

    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Forbidden(_) => 403,
            ServiceError::Conflict(conflict) => conflict.status(),
            ServiceError::Invalid(_) => 422,
            ServiceError::Db(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
