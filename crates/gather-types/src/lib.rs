//! # gather-types
//!
//! Shared domain records and request payloads used across the Gather
//! workspace. Records mirror the persisted tables one-to-one; payload
//! structs describe what a caller may send for create and update
//! operations.

pub mod group;
pub mod social;
pub mod study;
pub mod user;

pub use group::{Group, GroupMember, GroupRole, InviteCode, InviteLink, NewGroup, NewInvite};
pub use social::{
    CommentBody, GroupSession, GroupStudy, NewResponse, NoteBody, ResponseBody, StudyPassageComment,
    StudyPassageLike, StudyQuestionResponse, StudySessionNote,
};
pub use study::{
    NewPassage, NewQuestion, NewSession, NewStudy, PassagePatch, QuestionPatch, SessionPatch,
    SessionPosition, Study, StudyPassage, StudyPatch, StudyQuestion, StudySession,
};
pub use user::{ProfileUpdate, UserProfile};

/// Common id aliases. Every entity is keyed by a random UUID v4.
pub type GroupId = uuid::Uuid;
pub type MemberId = uuid::Uuid;
pub type InviteId = uuid::Uuid;
pub type StudyId = uuid::Uuid;
pub type SessionId = uuid::Uuid;
pub type PassageId = uuid::Uuid;
pub type QuestionId = uuid::Uuid;
pub type ResponseId = uuid::Uuid;
pub type LikeId = uuid::Uuid;
pub type CommentId = uuid::Uuid;
pub type NoteId = uuid::Uuid;
pub type GroupStudyId = uuid::Uuid;
pub type GroupSessionId = uuid::Uuid;
pub type UserId = uuid::Uuid;

/// Stable per-user identifier issued by the identity provider (`sub` claim).
pub type Subject = String;

/// Seconds in one day, used for invite expiry arithmetic.
pub const SECS_PER_DAY: u64 = 86_400;

/// Default display name given to a profile created on first access.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Generate a fresh entity id.
pub fn new_id() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(super::new_id(), super::new_id());
    }

    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::group::Group::export_all_to(&dir).expect("export group");
        crate::group::InviteLink::export_all_to(&dir).expect("export invite link");
        crate::study::StudySession::export_all_to(&dir).expect("export session");
        crate::social::StudyQuestionResponse::export_all_to(&dir).expect("export response");
        crate::user::UserProfile::export_all_to(&dir).expect("export profile");
    }
}
